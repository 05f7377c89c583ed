//! Leaf entries of a view template.

use super::predicate::{passes, EvalContext};

/// How an item's editor is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorStyle {
    /// The attribute's default editor.
    #[default]
    Simple,
    /// A custom (usually larger) editor.
    Custom,
    /// A plain text editor.
    Text,
    /// A non-editable rendering of the value.
    Readonly,
}

/// A single leaf entry in a view template.
///
/// An item names the model attribute it edits, plus presentation hints the
/// layout engine reads: label, editor style, size hints, and the predicate
/// strings gating its presence and state. Items are template data — built
/// once, often at startup, and shared across editor sessions.
///
/// # Example
///
/// ```
/// use trellis::view::{EditorStyle, Item};
///
/// let item = Item::new("name")
///     .with_label("Full name")
///     .with_style(EditorStyle::Text)
///     .with_visible_when("mode == 'detailed'");
/// assert_eq!(item.display_label(), "Full name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The target attribute on the model object.
    name: String,
    /// Element id; empty means "not includable".
    id: String,
    /// Display label; empty means "derive from the name".
    label: String,
    /// Editor style.
    style: EditorStyle,
    /// Gate on whether the item exists in the materialized view at all.
    defined_when: String,
    /// Gate on whether the item is shown.
    visible_when: String,
    /// Gate on whether the item's editor is enabled.
    enabled_when: String,
    /// Width hint; `-1.0` means unset.
    width: f32,
    /// Height hint; `-1.0` means unset.
    height: f32,
    /// Whether the item stretches to absorb extra space.
    springy: bool,
    /// Whether the item's label is shown.
    show_label: bool,
}

impl Item {
    /// Create an item editing the named attribute.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            label: String::new(),
            style: EditorStyle::default(),
            defined_when: String::new(),
            visible_when: String::new(),
            enabled_when: String::new(),
            width: -1.0,
            height: -1.0,
            springy: false,
            show_label: true,
        }
    }

    /// The target attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element id (empty unless explicitly set).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The identifier used for persisted UI state: the explicit id when
    /// set, else the attribute name.
    pub fn get_id(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }

    /// The raw label (may be empty).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The label to display: the explicit label, else the attribute name
    /// with underscores opened up and the first letter capitalized.
    pub fn display_label(&self) -> String {
        if !self.label.is_empty() {
            return self.label.clone();
        }
        let label = self.name.replace('_', " ");
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => label,
        }
    }

    /// The editor style.
    pub fn style(&self) -> EditorStyle {
        self.style
    }

    /// The defined-when predicate string.
    pub fn defined_when(&self) -> &str {
        &self.defined_when
    }

    /// The visible-when predicate string.
    pub fn visible_when(&self) -> &str {
        &self.visible_when
    }

    /// The enabled-when predicate string.
    pub fn enabled_when(&self) -> &str {
        &self.enabled_when
    }

    /// Width hint; `-1.0` when unset.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height hint; `-1.0` when unset.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether the item stretches to absorb extra space.
    pub fn springy(&self) -> bool {
        self.springy
    }

    /// Whether the item's label is shown.
    pub fn show_label(&self) -> bool {
        self.show_label
    }

    /// Whether this item can be replaced by a same-named include.
    pub fn is_includable(&self) -> bool {
        !self.id.is_empty()
    }

    /// Evaluate the visible-when gate against a scope.
    pub fn is_visible(&self, ctx: &EvalContext) -> bool {
        passes(&self.visible_when, ctx)
    }

    /// Evaluate the enabled-when gate against a scope.
    pub fn is_enabled(&self, ctx: &EvalContext) -> bool {
        passes(&self.enabled_when, ctx)
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Set the element id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the editor style.
    pub fn with_style(mut self, style: EditorStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the defined-when predicate.
    pub fn with_defined_when(mut self, expression: impl Into<String>) -> Self {
        self.defined_when = expression.into();
        self
    }

    /// Set the visible-when predicate.
    pub fn with_visible_when(mut self, expression: impl Into<String>) -> Self {
        self.visible_when = expression.into();
        self
    }

    /// Set the enabled-when predicate.
    pub fn with_enabled_when(mut self, expression: impl Into<String>) -> Self {
        self.enabled_when = expression.into();
        self
    }

    /// Set the width hint.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the height hint.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set whether the item stretches.
    pub fn with_springy(mut self, springy: bool) -> Self {
        self.springy = springy;
        self
    }

    /// Set whether the item's label is shown.
    pub fn with_show_label(mut self, show_label: bool) -> Self {
        self.show_label = show_label;
        self
    }
}
