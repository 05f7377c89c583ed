//! Single-column adapter for string-list editors.
//!
//! `ListStrAdapter` is the thin sibling of [`TabularAdapter`] for editors
//! over a plain list of strings: one implicit column, the same resolution
//! order, the same cache and invalidation behavior. Handlers registered here
//! go through the shared engine, so a delegate attached to a list adapter
//! behaves exactly as it would on a table.
//!
//! # Example
//!
//! ```
//! use trellis::adapter::{CellValue, ListStrAdapter, Operation, StrRowSource};
//!
//! let mut adapter = ListStrAdapter::new();
//! adapter.on(Operation::Text, |ctx| {
//!     CellValue::Str(format!("• {}", ctx.item.cell("item").display()))
//! });
//!
//! let mut rows = StrRowSource::from(vec!["one".to_string(), "two".to_string()]);
//! assert_eq!(adapter.get_text(Some(&rows), 1), "• two");
//!
//! adapter.insert(&mut rows, 0, "zero").unwrap();
//! assert_eq!(adapter.len(Some(&rows)), 3);
//! ```

use std::sync::Arc;

use trellis_core::Signal;

use crate::error::CommitError;

use super::context::{CellContext, CommitContext};
use super::delegate::DelegateAdapter;
use super::operation::Operation;
use super::row::{RowItem, RowSource};
use super::tabular::{Column, TabularAdapter};
use super::value::{CellValue, Color};

/// The id of the single implicit column.
pub const LIST_COLUMN_ID: &str = "item";

/// A row source over an owned `Vec<String>`.
///
/// Unlike the blanket `Vec<T>` source, string lists support insertion: the
/// inserted text *is* the new row.
#[derive(Debug, Clone, Default)]
pub struct StrRowSource {
    items: Vec<String>,
}

impl StrRowSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing strings.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Consume the source, returning the backing strings.
    pub fn into_inner(self) -> Vec<String> {
        self.items
    }
}

impl From<Vec<String>> for StrRowSource {
    fn from(items: Vec<String>) -> Self {
        Self { items }
    }
}

impl RowSource for StrRowSource {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn item(&self, row: usize) -> Option<&dyn RowItem> {
        self.items.get(row).map(|item| item as &dyn RowItem)
    }

    fn item_mut(&mut self, row: usize) -> Option<&mut dyn RowItem> {
        self.items.get_mut(row).map(|item| item as &mut dyn RowItem)
    }

    fn insert(&mut self, row: usize, text: &str) -> Result<(), CommitError> {
        if row > self.items.len() {
            return Err(CommitError::out_of_range(row));
        }
        self.items.insert(row, text.to_string());
        Ok(())
    }

    fn remove(&mut self, row: usize) -> Result<(), CommitError> {
        if row >= self.items.len() {
            return Err(CommitError::out_of_range(row));
        }
        self.items.remove(row);
        Ok(())
    }
}

/// The adapter underlying string-list editors.
///
/// A façade over [`TabularAdapter`] with one implicit column whose id is
/// [`LIST_COLUMN_ID`]; every entry point drops the column argument.
pub struct ListStrAdapter {
    inner: TabularAdapter,
}

impl Default for ListStrAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListStrAdapter {
    /// Create a list adapter.
    pub fn new() -> Self {
        Self {
            inner: TabularAdapter::new(vec![Column::new("Item", LIST_COLUMN_ID)]),
        }
    }

    /// Register the generic handler for `op`.
    pub fn on<F>(&mut self, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.inner.on(op, handler);
    }

    /// Register a type-qualified handler for `op`.
    pub fn on_type<F>(&mut self, type_tag: &'static str, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.inner.on_type(type_tag, op, handler);
    }

    /// Register the generic commit handler.
    pub fn on_commit<F>(&mut self, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.inner.on_commit(op, handler);
    }

    /// Attach a delegated sub-adapter.
    pub fn add_delegate(&mut self, delegate: Arc<dyn DelegateAdapter>) {
        self.inner.add_delegate(delegate);
    }

    /// The signal fired once per cache flush.
    pub fn cache_flushed(&self) -> &Signal<()> {
        self.inner.cache_flushed()
    }

    /// Flush the resolution cache and notify observers once.
    pub fn flush_cache(&self) {
        self.inner.flush_cache();
    }

    /// Drop cached handlers and delegate subscriptions.
    pub fn cleanup(&mut self) {
        self.inner.cleanup();
    }

    /// Set the default editability.
    pub fn set_can_edit(&mut self, can_edit: bool) {
        self.inner.set_can_edit(can_edit);
    }

    /// Set the text a newly created row starts from.
    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.inner.set_default_value(value);
    }

    /// Number of rows; 0 for a torn-down (`None`) source.
    pub fn len(&self, source: Option<&dyn RowSource>) -> usize {
        self.inner.len(source)
    }

    /// Returns `true` when the source is absent or empty.
    pub fn is_empty(&self, source: Option<&dyn RowSource>) -> bool {
        self.inner.is_empty(source)
    }

    /// The display text of a row.
    pub fn get_text(&self, source: Option<&dyn RowSource>, row: usize) -> String {
        self.inner.get_text(source, row, 0)
    }

    /// Image token for a row, or `None`.
    pub fn get_image(&self, source: Option<&dyn RowSource>, row: usize) -> Option<String> {
        self.inner.get_image(source, row, 0)
    }

    /// Background color token, or `None` for the widget default.
    pub fn get_bg_color(&self, source: Option<&dyn RowSource>, row: usize) -> Option<Color> {
        self.inner.get_bg_color(source, row, 0)
    }

    /// Text color token, or `None` for the widget default.
    pub fn get_text_color(&self, source: Option<&dyn RowSource>, row: usize) -> Option<Color> {
        self.inner.get_text_color(source, row, 0)
    }

    /// Whether a row accepts in-place editing.
    pub fn get_can_edit(&self, source: Option<&dyn RowSource>, row: usize) -> bool {
        self.inner.get_can_edit(source, row, 0)
    }

    /// The text a newly created row starts from.
    pub fn get_default_value(&self, source: Option<&dyn RowSource>) -> String {
        self.inner.get_default_value(source)
    }

    /// Commit edited text into a row.
    pub fn set_text(
        &self,
        source: &mut dyn RowSource,
        row: usize,
        text: &str,
    ) -> Result<(), CommitError> {
        self.inner.set_text(source, row, 0, text)
    }

    /// Insert a new row before `row`.
    pub fn insert(
        &self,
        source: &mut dyn RowSource,
        row: usize,
        text: &str,
    ) -> Result<(), CommitError> {
        self.inner.insert(source, row, text)
    }

    /// Delete the row at `row`.
    pub fn delete(&self, source: &mut dyn RowSource, row: usize) -> Result<(), CommitError> {
        self.inner.delete(source, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::delegate::DelegateBase;

    fn letters() -> StrRowSource {
        StrRowSource::from(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    }

    #[test]
    fn test_text_fallback_shows_the_string() {
        let adapter = ListStrAdapter::new();
        let rows = letters();
        assert_eq!(adapter.get_text(Some(&rows), 0), "a");
        assert_eq!(adapter.get_text(Some(&rows), 2), "c");
    }

    #[test]
    fn test_len_none_is_zero() {
        let adapter = ListStrAdapter::new();
        assert_eq!(adapter.len(None), 0);
        assert_eq!(adapter.get_text(None, 0), "");
    }

    #[test]
    fn test_set_text_replaces_row() {
        let adapter = ListStrAdapter::new();
        let mut rows = letters();
        adapter.set_text(&mut rows, 1, "beta").unwrap();
        assert_eq!(rows.items(), ["a", "beta", "c"]);
    }

    #[test]
    fn test_insert_and_delete() {
        let adapter = ListStrAdapter::new();
        let mut rows = letters();

        adapter.insert(&mut rows, 1, "between").unwrap();
        assert_eq!(rows.items(), ["a", "between", "b", "c"]);

        adapter.delete(&mut rows, 0).unwrap();
        assert_eq!(rows.items(), ["between", "b", "c"]);

        assert!(adapter.delete(&mut rows, 10).is_err());
    }

    #[test]
    fn test_delegate_applies_to_list_rows() {
        let mut adapter = ListStrAdapter::new();
        let delegate = Arc::new(DelegateBase::new());
        delegate.on(Operation::Text, |ctx| {
            CellValue::Str(ctx.item.cell(LIST_COLUMN_ID).display().to_uppercase())
        });
        adapter.add_delegate(delegate);

        let rows = letters();
        assert_eq!(adapter.get_text(Some(&rows), 0), "A");
    }

    #[test]
    fn test_default_value() {
        let mut adapter = ListStrAdapter::new();
        assert_eq!(adapter.get_default_value(None), "");
        adapter.set_default_value("new item");
        assert_eq!(adapter.get_default_value(None), "new item");
    }
}
