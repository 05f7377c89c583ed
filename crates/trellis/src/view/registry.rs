//! The view-element symbol table.

use std::collections::HashMap;

use crate::error::{ViewError, ViewResult};

use super::element::ViewElement;

/// A registry mapping element ids to previously extracted template content.
///
/// [`Group::replace_include`](super::Group::replace_include) populates it;
/// include resolution during materialization reads it. One registry is
/// shared across the templates of a single editor session — nothing here is
/// global or thread-shared.
///
/// # Example
///
/// ```
/// use trellis::view::{Group, Item, ViewElements};
///
/// let mut registry = ViewElements::new();
/// registry
///     .register("extra", Group::new().child(Item::new("notes")))
///     .unwrap();
/// assert!(registry.contains("extra"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewElements {
    content: HashMap<String, ViewElement>,
}

impl ViewElements {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element under `id`.
    ///
    /// Registering an id twice is a configuration error naming the
    /// duplicate.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        element: impl Into<ViewElement>,
    ) -> ViewResult<()> {
        let id = id.into();
        if self.content.contains_key(&id) {
            return Err(ViewError::duplicate_id(id));
        }
        self.content.insert(id, element.into());
        Ok(())
    }

    /// Look up an element by id.
    pub fn find(&self, id: &str) -> Option<&ViewElement> {
        self.content.get(id)
    }

    /// Whether an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.content.contains_key(id)
    }

    /// The registered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.content.keys().map(String::as_str)
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
