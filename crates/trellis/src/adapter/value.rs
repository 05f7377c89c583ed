//! Neutral value tokens exchanged between adapters and widgets.
//!
//! Resolved handlers return [`CellValue`] tokens; the surrounding widget
//! layer is responsible for translating them into toolkit-native objects
//! (brushes, fonts, menus). Nothing here paints or touches a toolkit.

use std::fmt;

/// An RGBA color token.
///
/// This is a plain value the widget layer maps onto whatever color type its
/// toolkit uses. Components are 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Create an opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Align to the left edge.
    #[default]
    Left,
    /// Align to the center.
    Center,
    /// Align to the right edge.
    Right,
}

/// Type-agnostic container for the result of an adapter operation.
///
/// Each operation has a natural payload (text, color, boolean, numeric
/// width); `CellValue` carries any of them through the single resolution
/// path. The `as_*` accessors return `None` when the variant does not match.
///
/// # Example
///
/// ```
/// use trellis::adapter::CellValue;
///
/// let value = CellValue::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert!(value.as_int().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value. Rendered as an empty string; the widget's default applies.
    #[default]
    None,
    /// String data (text, tooltips, image and font tokens, menu descriptors).
    Str(String),
    /// Integer data.
    Int(i64),
    /// Floating point data (also carries column width requests).
    Float(f64),
    /// Boolean data (can-edit, can-drop).
    Bool(bool),
    /// Color token.
    Color(Color),
    /// Alignment token.
    Alignment(Alignment),
}

impl CellValue {
    /// Returns `true` if this is `CellValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns `true` if this contains some value.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an owned string.
    pub fn into_string(self) -> Option<String> {
        match self {
            CellValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a float.
    ///
    /// Integers convert; other variants do not.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            CellValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as a color token.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            CellValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Attempts to get the value as an alignment token.
    pub fn as_alignment(&self) -> Option<Alignment> {
        match self {
            CellValue::Alignment(a) => Some(*a),
            _ => None,
        }
    }

    /// The user-facing text for this value.
    ///
    /// `None` renders as an empty string; every other variant formats its
    /// payload. This is what the generic text fallback shows for a cell.
    pub fn display(&self) -> String {
        match self {
            CellValue::None => String::new(),
            CellValue::Str(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Color(c) => format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            CellValue::Alignment(a) => format!("{a:?}"),
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Str(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Str(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<Color> for CellValue {
    fn from(c: Color) -> Self {
        CellValue::Color(c)
    }
}

impl From<Alignment> for CellValue {
    fn from(a: Alignment) -> Self {
        CellValue::Alignment(a)
    }
}

impl From<Option<String>> for CellValue {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => CellValue::Str(s),
            None => CellValue::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_str() {
        let value = CellValue::from("hello");
        assert_eq!(value.as_str(), Some("hello"));
        assert!(value.as_int().is_none());
        assert_eq!(value.display(), "hello");
    }

    #[test]
    fn test_cell_value_numeric() {
        assert_eq!(CellValue::from(3).as_float(), Some(3.0));
        assert_eq!(CellValue::from(0.5).as_float(), Some(0.5));
        assert!(CellValue::from("3").as_float().is_none());
    }

    #[test]
    fn test_cell_value_none_displays_empty() {
        assert_eq!(CellValue::None.display(), "");
        assert!(CellValue::None.is_none());
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::WHITE, Color::rgb(255, 255, 255));
        assert_eq!(Color::TRANSPARENT.a, 0);
    }
}
