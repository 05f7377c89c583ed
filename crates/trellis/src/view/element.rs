//! The closed family of view-template children.
//!
//! A group's content is a sequence of [`ViewElement`]s: leaf items, nested
//! groups, or named [`Include`] placeholders resolved at materialization
//! time. Items and groups are shared by `Arc` — templates are built once and
//! aliased, never deep-copied, into registries and materialized trees.

use std::sync::Arc;

use super::group::Group;
use super::item::Item;

/// A named placeholder in a view template.
///
/// Carries only an id; at materialization time it is replaced by whatever
/// the registry maps that id to. A lookup miss drops the placeholder
/// silently — includes are optional splice points, not hard references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    id: String,
}

impl Include {
    /// Create a placeholder for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The referenced id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One child of a view-template group.
#[derive(Debug, Clone)]
pub enum ViewElement {
    /// A leaf entry.
    Item(Arc<Item>),
    /// A nested sub-group.
    Group(Arc<Group>),
    /// A named placeholder.
    Include(Include),
}

impl ViewElement {
    /// Check if this element is an item.
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Check if this element is an include placeholder.
    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include(_))
    }

    /// Get the item if this is an item element.
    pub fn as_item(&self) -> Option<&Arc<Item>> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Get the group if this is a group element.
    pub fn as_group(&self) -> Option<&Arc<Group>> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The element's id (empty for anonymous elements).
    pub fn id(&self) -> &str {
        match self {
            Self::Item(item) => item.id(),
            Self::Group(group) => group.id(),
            Self::Include(include) => include.id(),
        }
    }

    /// Whether this element can be replaced by a same-named include.
    ///
    /// Includes themselves are placeholders, never includable.
    pub fn is_includable(&self) -> bool {
        match self {
            Self::Item(item) => item.is_includable(),
            Self::Group(group) => group.is_includable(),
            Self::Include(_) => false,
        }
    }
}

impl From<Item> for ViewElement {
    fn from(item: Item) -> Self {
        Self::Item(Arc::new(item))
    }
}

impl From<Arc<Item>> for ViewElement {
    fn from(item: Arc<Item>) -> Self {
        Self::Item(item)
    }
}

impl From<Group> for ViewElement {
    fn from(group: Group) -> Self {
        Self::Group(Arc::new(group))
    }
}

impl From<Arc<Group>> for ViewElement {
    fn from(group: Arc<Group>) -> Self {
        Self::Group(group)
    }
}

impl From<Include> for ViewElement {
    fn from(include: Include) -> Self {
        Self::Include(include)
    }
}

/// A bare sequence of elements auto-wraps into an anonymous sub-group.
impl From<Vec<ViewElement>> for ViewElement {
    fn from(content: Vec<ViewElement>) -> Self {
        let mut group = Group::new();
        group.set_content(content);
        Self::Group(Arc::new(group))
    }
}

/// String children: `"<name>"` is an include placeholder, anything else is
/// an item editing the named attribute.
impl From<&str> for ViewElement {
    fn from(s: &str) -> Self {
        if let Some(id) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
            Self::Include(Include::new(id))
        } else {
            Self::Item(Arc::new(Item::new(s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_string_becomes_include() {
        let element = ViewElement::from("<extra>");
        assert!(element.is_include());
        assert_eq!(element.id(), "extra");
        assert!(!element.is_includable());
    }

    #[test]
    fn test_vec_of_elements_wraps_into_anonymous_group() {
        let element = ViewElement::from(vec![
            ViewElement::from("name"),
            ViewElement::from("age"),
        ]);
        let group = element.as_group().unwrap();
        assert_eq!(group.content().len(), 2);
        assert!(group.id().is_empty());
    }

    #[test]
    fn test_bare_string_becomes_item() {
        let element = ViewElement::from("name");
        assert!(element.is_item());
        assert_eq!(element.as_item().unwrap().name(), "name");
    }
}
