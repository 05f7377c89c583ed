//! The model boundary: row items and row sources.
//!
//! An adapter never sees the host model directly. It sees a [`RowSource`] —
//! a named sequence on some model object — whose elements are [`RowItem`]s.
//! Dispatch is on the *runtime* type of each item: every item reports an
//! ordered list of type tags, most specific first, which stands in for the
//! open-ended class-hierarchy walk a dynamic language would do. Handlers
//! registered for an earlier tag win over handlers for a later one.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use trellis::adapter::{CellValue, RowItem};
//!
//! struct Task {
//!     title: String,
//!     done: bool,
//! }
//!
//! impl RowItem for Task {
//!     fn type_tags(&self) -> &'static [&'static str] {
//!         &["Task"]
//!     }
//!
//!     fn cell(&self, column_id: &str) -> CellValue {
//!         match column_id {
//!             "title" => CellValue::from(self.title.as_str()),
//!             "done" => CellValue::from(self.done),
//!             _ => CellValue::None,
//!         }
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use std::any::Any;

use crate::error::CommitError;

use super::value::CellValue;

/// A single row in a tabular or list editor.
///
/// Implementations expose their fields by column id and declare their place
/// in the host type hierarchy via [`type_tags`](RowItem::type_tags). The
/// first tag is the item's own "class name" and keys the resolution cache;
/// subsequent tags name ancestors, so a handler registered for a base tag
/// applies to every derived item that lists it.
pub trait RowItem: Any + Send + Sync {
    /// Ordered type tags, most specific first. Must be non-empty.
    fn type_tags(&self) -> &'static [&'static str];

    /// The field value for a column id.
    ///
    /// Return `CellValue::None` for unknown columns; the generic fallbacks
    /// render that as an empty cell rather than failing.
    fn cell(&self, column_id: &str) -> CellValue;

    /// Write a field value for a column id.
    ///
    /// The default rejects the edit. Implement this for rows that accept
    /// the generic set-text fallback; coercion failures should be reported
    /// as [`CommitError::Invalid`] so the widget layer can flag the input.
    fn set_cell(&mut self, column_id: &str, _value: &CellValue) -> Result<(), CommitError> {
        Err(CommitError::read_only(column_id))
    }

    /// The item as `Any`, for downcasting inside registered handlers.
    fn as_any(&self) -> &dyn Any;

    /// The most specific type tag.
    fn type_tag(&self) -> &'static str {
        self.type_tags().first().copied().unwrap_or("item")
    }
}

/// String rows for list editors.
///
/// The whole string is the single column; any column id reads it.
impl RowItem for String {
    fn type_tags(&self) -> &'static [&'static str] {
        &["str"]
    }

    fn cell(&self, _column_id: &str) -> CellValue {
        CellValue::from(self.as_str())
    }

    fn set_cell(&mut self, _column_id: &str, value: &CellValue) -> Result<(), CommitError> {
        *self = value.display();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The named sequence of rows on a model object.
///
/// This is the only view an adapter has of the host model. A source that has
/// already been torn down is represented by passing `None` to the adapter
/// entry points, which then answer with neutral defaults instead of failing.
pub trait RowSource: Send + Sync {
    /// Number of rows.
    fn len(&self) -> usize;

    /// Returns `true` if the source has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `row`, or `None` when out of range.
    fn item(&self, row: usize) -> Option<&dyn RowItem>;

    /// Mutable access to the item at `row`, or `None` when out of range.
    fn item_mut(&mut self, row: usize) -> Option<&mut dyn RowItem>;

    /// Insert a new row built from `text` before `row`.
    ///
    /// The default reports the operation as unsupported; sources that can
    /// construct rows from text override this.
    fn insert(&mut self, _row: usize, _text: &str) -> Result<(), CommitError> {
        Err(CommitError::unsupported("insert"))
    }

    /// Remove the row at `row`.
    fn remove(&mut self, _row: usize) -> Result<(), CommitError> {
        Err(CommitError::unsupported("remove"))
    }

    /// The text a newly created row starts from.
    fn default_value(&self) -> String {
        String::new()
    }
}

/// Any vector of row items is a row source.
///
/// Insertion stays unsupported (a `T` cannot be built from bare text in
/// general); removal works.
impl<T: RowItem> RowSource for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn item(&self, row: usize) -> Option<&dyn RowItem> {
        self.get(row).map(|item| item as &dyn RowItem)
    }

    fn item_mut(&mut self, row: usize) -> Option<&mut dyn RowItem> {
        self.get_mut(row).map(|item| item as &mut dyn RowItem)
    }

    fn remove(&mut self, row: usize) -> Result<(), CommitError> {
        if row >= self.as_slice().len() {
            return Err(CommitError::out_of_range(row));
        }
        Vec::remove(self, row);
        Ok(())
    }
}
