//! Group containers of a view template.

use std::sync::Arc;

use crate::error::ViewResult;

use super::element::{Include, ViewElement};
use super::predicate::{passes, EvalContext};
use super::registry::ViewElements;

/// Orientation of a group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Children are arranged left to right.
    Horizontal,
    /// Children are arranged top to bottom.
    #[default]
    Vertical,
}

impl Orientation {
    /// Get the cross (perpendicular) orientation.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// How a group lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupLayout {
    /// A plain box of children.
    #[default]
    Normal,
    /// Children separated by draggable splitter bars.
    Split,
    /// Children become tabs of a notebook.
    Tabbed,
    /// Children flow and wrap like words in a paragraph.
    Flow,
    /// Children become sections of a fold-out panel.
    Fold,
}

/// An ordered container of view-template children.
///
/// Groups are the structural nodes of a view template: they hold items,
/// nested sub-groups, and include placeholders, plus the presentation traits
/// the layout engine reads (orientation, layout mode, border, label policy).
/// Like items, groups are static template data reused across editor
/// sessions; the per-session, placeholder-free form is the
/// [`ShadowGroup`](super::ShadowGroup) produced by
/// [`get_shadow`](Group::get_shadow).
///
/// # Example
///
/// ```
/// use trellis::view::{Group, GroupLayout, Item};
///
/// let group = Group::new()
///     .child(Item::new("name"))
///     .child(Item::new("age"))
///     .child("<extra>")
///     .options("=[Person]:person");
/// assert_eq!(group.id(), "person");
/// assert_eq!(group.label(), "Person");
/// assert_eq!(group.layout(), GroupLayout::Split);
/// assert!(group.show_border());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Group {
    /// The ordered children.
    pub(super) content: Vec<ViewElement>,
    pub(super) id: String,
    pub(super) label: String,
    /// The context id naming which object predicates and items bind to.
    pub(super) object: String,
    pub(super) orientation: Orientation,
    pub(super) layout: GroupLayout,
    pub(super) show_border: bool,
    pub(super) show_labels: bool,
    pub(super) show_left: bool,
    pub(super) springy: bool,
    pub(super) scrollable: bool,
    /// Whether this group is the initially selected tab of its notebook.
    pub(super) selected: bool,
    /// Children per row; 1 means a single column.
    pub(super) columns: usize,
    pub(super) padding: f32,
    pub(super) defined_when: String,
    pub(super) visible_when: String,
    pub(super) enabled_when: String,
}

impl Group {
    /// Create an empty group with default presentation.
    pub fn new() -> Self {
        Self {
            object: "object".to_string(),
            show_labels: true,
            show_left: true,
            columns: 1,
            ..Self::default()
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The ordered children.
    pub fn content(&self) -> &[ViewElement] {
        &self.content
    }

    /// The element id (empty for anonymous groups).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The border label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The context id naming which object this group's content binds to.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Orientation of the children.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Layout mode.
    pub fn layout(&self) -> GroupLayout {
        self.layout
    }

    /// Whether a border (with the label) is drawn.
    pub fn show_border(&self) -> bool {
        self.show_border
    }

    /// Whether child items show their labels.
    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    /// Whether child labels sit to the left of their editors.
    pub fn show_left(&self) -> bool {
        self.show_left
    }

    /// Whether the group stretches to absorb extra space.
    pub fn springy(&self) -> bool {
        self.springy
    }

    /// Whether the group scrolls when its content overflows.
    pub fn scrollable(&self) -> bool {
        self.scrollable
    }

    /// Whether this group is the initially selected tab.
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Children per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Padding around each child.
    pub fn padding(&self) -> f32 {
        self.padding
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

    /// Whether this group can be replaced by a same-named include.
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
    // Construction
    // =========================================================================

    /// Append a child.
    pub fn child(mut self, child: impl Into<ViewElement>) -> Self {
        self.content.push(child.into());
        self
    }

    /// Append several children.
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ViewElement>,
    {
        self.content.extend(children.into_iter().map(Into::into));
        self
    }

    /// Replace the whole content sequence.
    pub fn set_content(&mut self, content: Vec<ViewElement>) {
        self.content = content;
    }

    /// Set the element id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the border label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the context id.
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = object.into();
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the layout mode.
    pub fn with_layout(mut self, layout: GroupLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set whether a border is drawn.
    pub fn with_show_border(mut self, show_border: bool) -> Self {
        self.show_border = show_border;
        self
    }

    /// Set whether child items show their labels.
    pub fn with_show_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    /// Set which side child labels sit on.
    pub fn with_show_left(mut self, show_left: bool) -> Self {
        self.show_left = show_left;
        self
    }

    /// Set whether the group stretches.
    pub fn with_springy(mut self, springy: bool) -> Self {
        self.springy = springy;
        self
    }

    /// Set whether the group scrolls.
    pub fn with_scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = scrollable;
        self
    }

    /// Mark this group as the initially selected tab.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set the children-per-row count (minimum 1).
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Set the padding around each child.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
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

    // =========================================================================
    // Include extraction
    // =========================================================================

    /// Extract includable children into `registry`, leaving same-named
    /// [`Include`] placeholders in their place.
    ///
    /// This is the template-inheritance mechanism: a base template calls
    /// this once, after which derived templates can splice replacement
    /// content in by id. Registering an id twice is a configuration error.
    /// Recursion continues into every group child, including the extracted
    /// ones, so nested includables register too.
    pub fn replace_include(&mut self, registry: &mut ViewElements) -> ViewResult<()> {
        for child in &mut self.content {
            if child.is_includable() {
                let id = child.id().to_string();
                let mut original =
                    std::mem::replace(child, ViewElement::Include(Include::new(id.clone())));
                if let ViewElement::Group(group) = &mut original {
                    Arc::make_mut(group).replace_include(registry)?;
                }
                registry.register(id, original)?;
            } else if let ViewElement::Group(group) = child {
                Arc::make_mut(group).replace_include(registry)?;
            }
        }
        Ok(())
    }
}
