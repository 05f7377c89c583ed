//! The tabular adapter: resolution, caching, and invalidation.
//!
//! A [`TabularAdapter`] answers every question a table or list widget asks
//! about a cell — text, colors, alignment, width, editability, drag and drop
//! behavior — by finding the most specific handler for the
//! `(item type, column, operation)` address of the query.
//!
//! # Resolution order
//!
//! The first match wins, checked strictly in this order:
//!
//! 1. **Delegated sub-adapters**, in attachment order: a delegate whose
//!    `accepts` is true and that exposes a handler for
//!    `(column, operation)` or `(operation)`. A non-cacheable delegate's
//!    match is used immediately but never cached, so the full scan repeats
//!    on the next query of the same triple.
//! 2. **Type-qualified conventions** on the adapter itself, walking the
//!    item's type tags most-specific-first: `(tag, column, operation)`,
//!    then `(tag, operation)`.
//! 3. **Column conventions**: `(column, operation)`.
//! 4. **The generic handler** for the operation — a registered override if
//!    any, else a built-in fallback that always produces a neutral answer.
//!
//! # Caching
//!
//! The resolved handler is cached under `(item type tag, operation, column
//! index)`; repeat queries of the same triple skip resolution entirely. The
//! cache is flushed — and [`cache_flushed`](TabularAdapter::cache_flushed)
//! fires exactly once per change — whenever the column set changes or an
//! attached delegate reports an update. Widgets treat the notification as a
//! cue to redraw and re-query.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use trellis::adapter::{CellValue, Column, Operation, RowItem, TabularAdapter};
//!
//! struct Person { name: String, age: i64 }
//!
//! impl RowItem for Person {
//!     fn type_tags(&self) -> &'static [&'static str] { &["Person"] }
//!     fn cell(&self, column_id: &str) -> CellValue {
//!         match column_id {
//!             "name" => CellValue::from(self.name.as_str()),
//!             "age" => CellValue::from(self.age),
//!             _ => CellValue::None,
//!         }
//!     }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! let mut adapter = TabularAdapter::new(vec![
//!     Column::new("Name", "name"),
//!     Column::new("Age", "age"),
//! ]);
//! adapter.on_column("age", Operation::Text, |ctx| {
//!     CellValue::Str(format!("{} years", ctx.item.cell("age").display()))
//! });
//!
//! let people = vec![Person { name: "Ada".into(), age: 36 }];
//! assert_eq!(adapter.get_text(Some(&people), 0, 0), "Ada");
//! assert_eq!(adapter.get_text(Some(&people), 0, 1), "36 years");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::logging::targets;
use trellis_core::{ConnectionId, Signal};

use crate::error::CommitError;

use super::context::{CellContext, CommitContext, CommitFn, QueryFn};
use super::delegate::DelegateAdapter;
use super::operation::Operation;
use super::row::{RowItem, RowSource};
use super::value::{Alignment, CellValue, Color};
use super::width::allocate_widths;

/// One column of a tabular editor: a display label plus an optional id.
///
/// The id is what handlers and row fields are addressed by; when omitted,
/// the column's positional index serves as its id. Labels need not be
/// unique — id/label lookup resolves to the first matching index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    label: String,
    id: Option<String>,
}

impl Column {
    /// Create a column with an explicit id.
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: Some(id.into()),
        }
    }

    /// Create a column addressed by its positional index.
    pub fn auto(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: None,
        }
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The explicit id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Registration key: optional type tag, optional column id, operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandlerKey {
    type_tag: Option<&'static str>,
    column: Option<String>,
    op: Operation,
}

impl HandlerKey {
    fn new(type_tag: Option<&'static str>, column: Option<&str>, op: Operation) -> Self {
        Self {
            type_tag,
            column: column.map(str::to_string),
            op,
        }
    }
}

/// Cache key: the runtime type tag of the item, the operation, and the
/// column index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    type_tag: &'static str,
    op: Operation,
    column: usize,
}

/// A cached resolved handler.
enum CachedHandler {
    Query(QueryFn),
    Commit(CommitFn),
}

impl Clone for CachedHandler {
    fn clone(&self) -> Self {
        match self {
            Self::Query(f) => Self::Query(f.clone()),
            Self::Commit(f) => Self::Commit(f.clone()),
        }
    }
}

type Cache = Arc<Mutex<HashMap<CacheKey, CachedHandler>>>;

/// The adapter underlying tabular editors.
///
/// Created once per editor instance. Handler registration normally happens
/// up front; the editor then calls the `get_*`/`set_text` entry points for
/// every visible cell, and the resolution cache makes repeat queries O(1).
///
/// See the [module documentation](self) for the resolution order.
pub struct TabularAdapter {
    columns: Vec<Column>,
    /// Effective id per column index (explicit id, else the decimal index).
    column_ids: Vec<String>,
    /// Label and id to first matching index, built once per column set.
    column_map: HashMap<String, usize>,
    can_edit: bool,
    default_value: String,
    queries: HashMap<HandlerKey, QueryFn>,
    commits: HashMap<HandlerKey, CommitFn>,
    delegates: Vec<Arc<dyn DelegateAdapter>>,
    delegate_conns: Vec<(Arc<dyn DelegateAdapter>, ConnectionId)>,
    cache: Cache,
    cache_flushed: Arc<Signal<()>>,
}

impl TabularAdapter {
    /// Create an adapter for the given column set.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut adapter = Self {
            columns: Vec::new(),
            column_ids: Vec::new(),
            column_map: HashMap::new(),
            can_edit: true,
            default_value: String::new(),
            queries: HashMap::new(),
            commits: HashMap::new(),
            delegates: Vec::new(),
            delegate_conns: Vec::new(),
            cache: Arc::new(Mutex::new(HashMap::new())),
            cache_flushed: Arc::new(Signal::new()),
        };
        adapter.rebuild_columns(columns);
        adapter
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// The current column set.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Replace the column set.
    ///
    /// Flushes the resolution cache and fires `cache_flushed` once.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.rebuild_columns(columns);
        self.flush_cache();
    }

    /// Resolve a column id or label to its index.
    pub fn column_index(&self, id_or_label: &str) -> Option<usize> {
        self.column_map.get(id_or_label).copied()
    }

    /// The effective id of a column index.
    pub fn column_id(&self, column: usize) -> Option<&str> {
        self.column_ids.get(column).map(String::as_str)
    }

    fn rebuild_columns(&mut self, columns: Vec<Column>) {
        self.column_ids = columns
            .iter()
            .enumerate()
            .map(|(i, c)| c.id().map(str::to_string).unwrap_or_else(|| i.to_string()))
            .collect();

        let mut map = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            // First occurrence wins for duplicate labels.
            map.entry(self.column_ids[i].clone()).or_insert(i);
            map.entry(column.label().to_string()).or_insert(i);
        }
        self.column_map = map;
        self.columns = columns;
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Whether cells are editable when no handler says otherwise.
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Set the default editability; flushes the cache (the cached can-edit
    /// fallback captured the old value).
    pub fn set_can_edit(&mut self, can_edit: bool) {
        if self.can_edit != can_edit {
            self.can_edit = can_edit;
            self.flush_cache();
        }
    }

    /// Set the text a newly created row starts from.
    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.default_value = value.into();
    }

    /// The signal fired once per cache flush.
    pub fn cache_flushed(&self) -> &Signal<()> {
        &self.cache_flushed
    }

    /// Flush the resolution cache and notify observers once.
    pub fn flush_cache(&self) {
        self.cache.lock().clear();
        tracing::trace!(target: targets::ADAPTER, "resolution cache flushed");
        self.cache_flushed.emit(());
    }

    /// Drop cached handlers, delegate subscriptions, and delegates.
    ///
    /// Called when the owning editor is disposed so the adapter retains
    /// nothing of the edited model. Registered handlers stay; the adapter
    /// can be reattached to a fresh source afterwards.
    pub fn cleanup(&mut self) {
        for (delegate, conn) in self.delegate_conns.drain(..) {
            delegate.updated().disconnect(conn);
        }
        self.delegates.clear();
        self.cache.lock().clear();
    }

    // =========================================================================
    // Handler registration
    // =========================================================================

    /// Register the generic handler for `op`, replacing the built-in
    /// fallback.
    pub fn on<F>(&mut self, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries
            .insert(HandlerKey::new(None, None, op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register a column-specific handler for `op`.
    pub fn on_column<F>(&mut self, column_id: &str, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries
            .insert(HandlerKey::new(None, Some(column_id), op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register a type-qualified handler for `op`, applying to every item
    /// whose type tags include `type_tag`.
    pub fn on_type<F>(&mut self, type_tag: &'static str, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries
            .insert(HandlerKey::new(Some(type_tag), None, op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register the most specific convention: type tag plus column.
    pub fn on_type_column<F>(
        &mut self,
        type_tag: &'static str,
        column_id: &str,
        op: Operation,
        handler: F,
    ) where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries.insert(
            HandlerKey::new(Some(type_tag), Some(column_id), op),
            Arc::new(handler),
        );
        self.cache.lock().clear();
    }

    /// Register the generic commit handler, replacing the built-in
    /// set-cell fallback.
    pub fn on_commit<F>(&mut self, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits
            .insert(HandlerKey::new(None, None, op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register a column-specific commit handler.
    pub fn on_commit_column<F>(&mut self, column_id: &str, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits
            .insert(HandlerKey::new(None, Some(column_id), op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register a type-qualified commit handler.
    pub fn on_commit_type<F>(&mut self, type_tag: &'static str, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits
            .insert(HandlerKey::new(Some(type_tag), None, op), Arc::new(handler));
        self.cache.lock().clear();
    }

    /// Register the most specific commit convention: type tag plus column.
    pub fn on_commit_type_column<F>(
        &mut self,
        type_tag: &'static str,
        column_id: &str,
        op: Operation,
        handler: F,
    ) where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits.insert(
            HandlerKey::new(Some(type_tag), Some(column_id), op),
            Arc::new(handler),
        );
        self.cache.lock().clear();
    }

    // =========================================================================
    // Delegates
    // =========================================================================

    /// Attach a delegated sub-adapter.
    ///
    /// Delegates are consulted in attachment order, first match wins. The
    /// delegate's `updated` signal is subscribed so each of its change
    /// batches flushes this adapter's cache exactly once.
    pub fn add_delegate(&mut self, delegate: Arc<dyn DelegateAdapter>) {
        let cache = self.cache.clone();
        let notify = self.cache_flushed.clone();
        let conn = delegate.updated().connect(move |_| {
            cache.lock().clear();
            tracing::trace!(target: targets::ADAPTER, "delegate updated, cache flushed");
            notify.emit(());
        });
        self.delegates.push(delegate.clone());
        self.delegate_conns.push((delegate, conn));
        self.flush_cache();
    }

    /// The attached delegates, in consultation order.
    pub fn delegates(&self) -> &[Arc<dyn DelegateAdapter>] {
        &self.delegates
    }

    // =========================================================================
    // Query entry points
    // =========================================================================

    /// Number of rows; 0 for a torn-down (`None`) source.
    pub fn len(&self, source: Option<&dyn RowSource>) -> usize {
        source.map_or(0, RowSource::len)
    }

    /// Returns `true` when the source is absent or empty.
    pub fn is_empty(&self, source: Option<&dyn RowSource>) -> bool {
        self.len(source) == 0
    }

    /// The display text of a cell.
    pub fn get_text(&self, source: Option<&dyn RowSource>, row: usize, column: usize) -> String {
        self.query(source, row, column, Operation::Text, None).display()
    }

    /// Tooltip text; empty when none is configured.
    pub fn get_tooltip(&self, source: Option<&dyn RowSource>, row: usize, column: usize) -> String {
        self.query(source, row, column, Operation::ToolTip, None)
            .display()
    }

    /// Image token for a cell, or `None`.
    pub fn get_image(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
    ) -> Option<String> {
        self.query(source, row, column, Operation::Image, None)
            .into_string()
    }

    /// Font token for a cell, or `None` for the widget default.
    pub fn get_font(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
    ) -> Option<String> {
        self.query(source, row, column, Operation::Font, None)
            .into_string()
    }

    /// Menu descriptor token for a cell's context menu.
    pub fn get_menu(&self, source: Option<&dyn RowSource>, row: usize, column: usize) -> CellValue {
        self.query(source, row, column, Operation::Menu, None)
    }

    /// Background color token, or `None` for the widget default.
    pub fn get_bg_color(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
    ) -> Option<Color> {
        self.query(source, row, column, Operation::BgColor, None)
            .as_color()
    }

    /// Text color token, or `None` for the widget default.
    pub fn get_text_color(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
    ) -> Option<Color> {
        self.query(source, row, column, Operation::TextColor, None)
            .as_color()
    }

    /// Horizontal alignment of a cell.
    pub fn get_alignment(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
    ) -> Alignment {
        self.query(source, row, column, Operation::Alignment, None)
            .as_alignment()
            .unwrap_or_default()
    }

    /// The requested width of a column.
    ///
    /// Width is a per-column question, so it is resolved against row 0.
    /// See [`allocate_widths`] for how requests map to pixels.
    pub fn get_width(&self, source: Option<&dyn RowSource>, column: usize) -> f32 {
        self.query(source, 0, column, Operation::Width, None)
            .as_float()
            .unwrap_or(-1.0) as f32
    }

    /// Whether a cell accepts in-place editing.
    pub fn get_can_edit(&self, source: Option<&dyn RowSource>, row: usize, column: usize) -> bool {
        self.query(source, row, column, Operation::CanEdit, None)
            .as_bool()
            .unwrap_or(false)
    }

    /// The value supplied when a cell is dragged.
    pub fn get_drag(&self, source: Option<&dyn RowSource>, row: usize, column: usize) -> CellValue {
        self.query(source, row, column, Operation::Drag, None)
    }

    /// Whether `value` may be dropped on a cell.
    pub fn get_can_drop(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
        value: &CellValue,
    ) -> bool {
        self.query(source, row, column, Operation::CanDrop, Some(value))
            .as_bool()
            .unwrap_or(false)
    }

    /// The value to store when `value` is dropped on a cell.
    pub fn get_dropped(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
        value: &CellValue,
    ) -> CellValue {
        self.query(source, row, column, Operation::Dropped, Some(value))
    }

    /// The text a newly created row starts from.
    pub fn get_default_value(&self, source: Option<&dyn RowSource>) -> String {
        if !self.default_value.is_empty() {
            return self.default_value.clone();
        }
        source.map(RowSource::default_value).unwrap_or_default()
    }

    /// Allocate pixel widths for every column against `available` space.
    ///
    /// Convenience wrapper gathering each column's requested width and
    /// applying [`allocate_widths`]; `overrides` carries user-resized
    /// widths.
    pub fn allocate(
        &self,
        source: Option<&dyn RowSource>,
        available: f32,
        overrides: &[Option<f32>],
    ) -> Vec<f32> {
        let requested: Vec<f32> = (0..self.columns.len())
            .map(|column| self.get_width(source, column))
            .collect();
        allocate_widths(available, &requested, &[], overrides)
    }

    // =========================================================================
    // Commit entry points
    // =========================================================================

    /// Commit edited text into a cell.
    ///
    /// Coercion failures from the resolved handler propagate unchanged; the
    /// widget layer reverts the edit and shows the error state.
    pub fn set_text(
        &self,
        source: &mut dyn RowSource,
        row: usize,
        column: usize,
        text: &str,
    ) -> Result<(), CommitError> {
        let value = CellValue::from(text);
        let fallback_id;
        let column_id: &str = match self.column_ids.get(column) {
            Some(id) => id,
            None => {
                fallback_id = column.to_string();
                &fallback_id
            }
        };

        let handler = {
            let Some(item) = source.item(row) else {
                return Err(CommitError::out_of_range(row));
            };
            let key = CacheKey {
                type_tag: item.type_tag(),
                op: Operation::SetText,
                column,
            };
            let ctx = CellContext {
                item,
                row,
                column,
                column_id,
                value: Some(&value),
            };
            let cached = self.cache.lock().get(&key).cloned();
            match cached {
                Some(CachedHandler::Commit(f)) => f,
                _ => {
                    let (f, cacheable) = self.resolve_commit(&ctx, Operation::SetText);
                    if cacheable {
                        self.cache
                            .lock()
                            .insert(key, CachedHandler::Commit(f.clone()));
                    }
                    f
                }
            }
        };

        let commit_ctx = CommitContext {
            row,
            column,
            column_id,
            value: &value,
        };
        let item = source
            .item_mut(row)
            .ok_or_else(|| CommitError::out_of_range(row))?;
        handler(item, &commit_ctx)
    }

    /// Insert a new row built from `text` before `row`.
    pub fn insert(
        &self,
        source: &mut dyn RowSource,
        row: usize,
        text: &str,
    ) -> Result<(), CommitError> {
        source.insert(row, text)
    }

    /// Delete the row at `row`.
    pub fn delete(&self, source: &mut dyn RowSource, row: usize) -> Result<(), CommitError> {
        source.remove(row)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve and invoke the query handler for one cell address.
    fn query(
        &self,
        source: Option<&dyn RowSource>,
        row: usize,
        column: usize,
        op: Operation,
        value: Option<&CellValue>,
    ) -> CellValue {
        let Some(source) = source else {
            return Self::neutral(op);
        };
        let Some(item) = source.item(row) else {
            return Self::neutral(op);
        };

        let fallback_id;
        let column_id: &str = match self.column_ids.get(column) {
            Some(id) => id,
            None => {
                fallback_id = column.to_string();
                &fallback_id
            }
        };

        let key = CacheKey {
            type_tag: item.type_tag(),
            op,
            column,
        };
        let ctx = CellContext {
            item,
            row,
            column,
            column_id,
            value,
        };

        // Fast path: replay the cached handler against the fresh context.
        let cached = self.cache.lock().get(&key).cloned();
        if let Some(CachedHandler::Query(f)) = cached {
            return f(&ctx);
        }

        let (handler, cacheable) = self.resolve_query(&ctx, op);
        if cacheable {
            self.cache
                .lock()
                .insert(key, CachedHandler::Query(handler.clone()));
        }
        handler(&ctx)
    }

    /// Find the query handler for a context, in strict priority order.
    ///
    /// Returns the handler and whether it may be cached.
    fn resolve_query(&self, ctx: &CellContext<'_>, op: Operation) -> (QueryFn, bool) {
        // Delegates first, attachment order, first match wins.
        for delegate in &self.delegates {
            if !delegate.accepts(ctx) {
                continue;
            }
            let found = delegate
                .query(Some(ctx.column_id), op)
                .or_else(|| delegate.query(None, op));
            if let Some(handler) = found {
                return (handler, delegate.is_cacheable());
            }
        }

        // Type-qualified conventions, most specific tag first.
        for tag in ctx.item.type_tags() {
            let qualified = HandlerKey::new(Some(tag), Some(ctx.column_id), op);
            if let Some(handler) = self.queries.get(&qualified) {
                return (handler.clone(), true);
            }
            let by_type = HandlerKey::new(Some(tag), None, op);
            if let Some(handler) = self.queries.get(&by_type) {
                return (handler.clone(), true);
            }
        }

        // Column convention.
        let by_column = HandlerKey::new(None, Some(ctx.column_id), op);
        if let Some(handler) = self.queries.get(&by_column) {
            return (handler.clone(), true);
        }

        // Generic override, else the built-in fallback.
        let generic = HandlerKey::new(None, None, op);
        if let Some(handler) = self.queries.get(&generic) {
            return (handler.clone(), true);
        }
        (self.fallback_query(op), true)
    }

    /// Find the commit handler for a context, same priority order as
    /// queries.
    fn resolve_commit(&self, ctx: &CellContext<'_>, op: Operation) -> (CommitFn, bool) {
        for delegate in &self.delegates {
            if !delegate.accepts(ctx) {
                continue;
            }
            let found = delegate
                .commit(Some(ctx.column_id), op)
                .or_else(|| delegate.commit(None, op));
            if let Some(handler) = found {
                return (handler, delegate.is_cacheable());
            }
        }

        for tag in ctx.item.type_tags() {
            let qualified = HandlerKey::new(Some(tag), Some(ctx.column_id), op);
            if let Some(handler) = self.commits.get(&qualified) {
                return (handler.clone(), true);
            }
            let by_type = HandlerKey::new(Some(tag), None, op);
            if let Some(handler) = self.commits.get(&by_type) {
                return (handler.clone(), true);
            }
        }

        let by_column = HandlerKey::new(None, Some(ctx.column_id), op);
        if let Some(handler) = self.commits.get(&by_column) {
            return (handler.clone(), true);
        }

        let generic = HandlerKey::new(None, None, op);
        if let Some(handler) = self.commits.get(&generic) {
            return (handler.clone(), true);
        }

        // Built-in fallback: write the coerced value into the row field.
        (
            Arc::new(|item: &mut dyn RowItem, ctx: &CommitContext<'_>| {
                item.set_cell(ctx.column_id, ctx.value)
            }),
            true,
        )
    }

    /// The built-in generic handler for an operation. Always succeeds.
    fn fallback_query(&self, op: Operation) -> QueryFn {
        match op {
            Operation::Text => Arc::new(|ctx: &CellContext<'_>| {
                CellValue::Str(ctx.item.cell(ctx.column_id).display())
            }),
            Operation::Drag => Arc::new(|ctx: &CellContext<'_>| ctx.item.cell(ctx.column_id)),
            Operation::Alignment => Arc::new(|_: &CellContext<'_>| {
                CellValue::Alignment(Alignment::Left)
            }),
            Operation::Width => Arc::new(|_: &CellContext<'_>| CellValue::Float(-1.0)),
            Operation::CanEdit => {
                let can_edit = self.can_edit;
                Arc::new(move |_: &CellContext<'_>| CellValue::Bool(can_edit))
            }
            Operation::CanDrop => Arc::new(|_: &CellContext<'_>| CellValue::Bool(false)),
            Operation::Dropped => Arc::new(|ctx: &CellContext<'_>| {
                ctx.value.cloned().unwrap_or_default()
            }),
            // Image, colors, tooltip, font, menu: no answer means the widget
            // default applies. SetText never reaches the query path.
            _ => Arc::new(|_: &CellContext<'_>| CellValue::None),
        }
    }

    /// The neutral answer for a query against an absent source or row.
    fn neutral(op: Operation) -> CellValue {
        match op {
            Operation::Text | Operation::ToolTip => CellValue::Str(String::new()),
            Operation::Alignment => CellValue::Alignment(Alignment::Left),
            Operation::Width => CellValue::Float(-1.0),
            Operation::CanEdit | Operation::CanDrop => CellValue::Bool(false),
            _ => CellValue::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::delegate::DelegateBase;
    use parking_lot::Mutex;
    use std::any::Any;

    struct Fruit {
        name: String,
        count: i64,
    }

    impl RowItem for Fruit {
        fn type_tags(&self) -> &'static [&'static str] {
            &["Fruit"]
        }

        fn cell(&self, column_id: &str) -> CellValue {
            match column_id {
                "name" => CellValue::from(self.name.as_str()),
                "count" => CellValue::from(self.count),
                _ => CellValue::None,
            }
        }

        fn set_cell(&mut self, column_id: &str, value: &CellValue) -> Result<(), CommitError> {
            match column_id {
                "name" => {
                    self.name = value.display();
                    Ok(())
                }
                "count" => {
                    self.count = value
                        .display()
                        .parse()
                        .map_err(|_| CommitError::invalid(column_id, value.display(), "not an integer"))?;
                    Ok(())
                }
                _ => Err(CommitError::read_only(column_id)),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn fruit_columns() -> Vec<Column> {
        vec![Column::new("Name", "name"), Column::new("Count", "count")]
    }

    fn fruits() -> Vec<Fruit> {
        vec![
            Fruit { name: "apple".into(), count: 3 },
            Fruit { name: "pear".into(), count: 7 },
        ]
    }

    #[test]
    fn test_generic_fallback_reads_cell() {
        let adapter = TabularAdapter::new(fruit_columns());
        let rows = fruits();
        assert_eq!(adapter.get_text(Some(&rows), 0, 0), "apple");
        assert_eq!(adapter.get_text(Some(&rows), 1, 1), "7");
    }

    #[test]
    fn test_len_of_none_source_is_zero() {
        let adapter = TabularAdapter::new(fruit_columns());
        assert_eq!(adapter.len(None), 0);
        assert!(adapter.is_empty(None));
        // Missing rows answer neutrally, never panic.
        assert_eq!(adapter.get_text(None, 0, 0), "");
        assert!(!adapter.get_can_edit(None, 0, 0));
    }

    #[test]
    fn test_column_lookup_by_id_and_label() {
        let adapter = TabularAdapter::new(fruit_columns());
        assert_eq!(adapter.column_index("name"), Some(0));
        assert_eq!(adapter.column_index("Count"), Some(1));
        assert_eq!(adapter.column_index("missing"), None);
    }

    #[test]
    fn test_duplicate_labels_resolve_to_first_index() {
        let adapter = TabularAdapter::new(vec![
            Column::new("Value", "a"),
            Column::new("Value", "b"),
        ]);
        assert_eq!(adapter.column_index("Value"), Some(0));
        assert_eq!(adapter.column_index("b"), Some(1));
    }

    #[test]
    fn test_positional_column_ids() {
        let adapter = TabularAdapter::new(vec![Column::auto("First"), Column::auto("Second")]);
        assert_eq!(adapter.column_id(0), Some("0"));
        assert_eq!(adapter.column_index("1"), Some(1));
    }

    #[test]
    fn test_handler_cached_and_resolved_once() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        let resolutions = Arc::new(Mutex::new(0));

        // The delegate lookup runs once per resolution; count through it.
        struct Counting {
            count: Arc<Mutex<usize>>,
            updated: Signal<()>,
        }
        impl DelegateAdapter for Counting {
            fn query(&self, column_id: Option<&str>, op: Operation) -> Option<QueryFn> {
                if column_id.is_none() && op == Operation::Text {
                    *self.count.lock() += 1;
                    Some(Arc::new(|_| CellValue::from("counted")))
                } else {
                    None
                }
            }
            fn updated(&self) -> &Signal<()> {
                &self.updated
            }
        }

        adapter.add_delegate(Arc::new(Counting {
            count: resolutions.clone(),
            updated: Signal::new(),
        }));

        let rows = fruits();
        let first = adapter.get_text(Some(&rows), 0, 0);
        let second = adapter.get_text(Some(&rows), 0, 0);
        assert_eq!(first, second);
        // Second query replayed the cached handler without re-resolving.
        assert_eq!(*resolutions.lock(), 1);
    }

    #[test]
    fn test_set_columns_flushes_cache_and_notifies_once() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        let rows = fruits();
        let _ = adapter.get_text(Some(&rows), 0, 0);

        let notifications = Arc::new(Mutex::new(0));
        let n = notifications.clone();
        adapter.cache_flushed().connect(move |_| *n.lock() += 1);

        adapter.set_columns(vec![Column::new("Name", "name")]);
        assert_eq!(*notifications.lock(), 1);
    }

    #[test]
    fn test_delegate_update_invalidates_cached_resolution() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        let delegate = Arc::new(DelegateBase::new());
        delegate.on(Operation::BgColor, |_| CellValue::from(Color::rgb(1, 2, 3)));
        adapter.add_delegate(delegate.clone());

        let rows = fruits();
        assert_eq!(
            adapter.get_bg_color(Some(&rows), 0, 0),
            Some(Color::rgb(1, 2, 3))
        );

        let notifications = Arc::new(Mutex::new(0));
        let n = notifications.clone();
        adapter.cache_flushed().connect(move |_| *n.lock() += 1);

        // Turning the delegate off flushes once and changes the answer.
        delegate.set_accepts(false);
        assert_eq!(*notifications.lock(), 1);
        assert_eq!(adapter.get_bg_color(Some(&rows), 0, 0), None);
    }

    #[test]
    fn test_first_delegate_wins() {
        let mut adapter = TabularAdapter::new(fruit_columns());

        let first = Arc::new(DelegateBase::new());
        first.on_column("name", Operation::Text, |_| CellValue::from("first"));
        let second = Arc::new(DelegateBase::new());
        second.on_column("name", Operation::Text, |_| CellValue::from("second"));

        adapter.add_delegate(first);
        adapter.add_delegate(second);

        let rows = fruits();
        assert_eq!(adapter.get_text(Some(&rows), 0, 0), "first");
    }

    #[test]
    fn test_delegate_beats_adapter_conventions() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        adapter.on_type_column("Fruit", "name", Operation::Text, |_| {
            CellValue::from("convention")
        });

        let delegate = Arc::new(DelegateBase::new());
        delegate.on_column("name", Operation::Text, |_| CellValue::from("delegate"));
        adapter.add_delegate(delegate);

        let rows = fruits();
        assert_eq!(adapter.get_text(Some(&rows), 0, 0), "delegate");
    }

    #[test]
    fn test_type_priority_most_specific_tag_wins() {
        struct Derived;
        impl RowItem for Derived {
            fn type_tags(&self) -> &'static [&'static str] {
                &["Derived", "Base"]
            }
            fn cell(&self, _: &str) -> CellValue {
                CellValue::None
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let mut adapter = TabularAdapter::new(vec![Column::new("Col", "col")]);
        adapter.on_column("col", Operation::Text, |_| CellValue::from("column"));
        adapter.on_type_column("Base", "col", Operation::Text, |_| CellValue::from("base"));
        adapter.on_type_column("Derived", "col", Operation::Text, |_| {
            CellValue::from("derived")
        });

        let rows = vec![Derived];
        assert_eq!(adapter.get_text(Some(&rows), 0, 0), "derived");
    }

    #[test]
    fn test_base_tag_convention_applies_to_derived_items() {
        struct Derived;
        impl RowItem for Derived {
            fn type_tags(&self) -> &'static [&'static str] {
                &["Derived", "Base"]
            }
            fn cell(&self, _: &str) -> CellValue {
                CellValue::None
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let mut adapter = TabularAdapter::new(vec![Column::new("Col", "col")]);
        adapter.on_type("Base", Operation::Text, |_| CellValue::from("base"));
        adapter.on_column("col", Operation::Text, |_| CellValue::from("column"));

        let rows = vec![Derived];
        // Type-qualified beats the bare column convention.
        assert_eq!(adapter.get_text(Some(&rows), 0, 0), "base");
    }

    #[test]
    fn test_non_cacheable_delegate_re_resolves_every_call() {
        let mut adapter = TabularAdapter::new(fruit_columns());

        struct Flicker {
            hits: Arc<Mutex<usize>>,
            lookups: Arc<Mutex<usize>>,
            updated: Signal<()>,
        }
        impl DelegateAdapter for Flicker {
            fn is_cacheable(&self) -> bool {
                false
            }
            fn query(&self, column_id: Option<&str>, op: Operation) -> Option<QueryFn> {
                if op == Operation::Text && column_id.is_none() {
                    *self.lookups.lock() += 1;
                    let hits = self.hits.clone();
                    Some(Arc::new(move |_| {
                        *hits.lock() += 1;
                        CellValue::from("flicker")
                    }))
                } else {
                    None
                }
            }
            fn updated(&self) -> &Signal<()> {
                &self.updated
            }
        }

        let hits = Arc::new(Mutex::new(0));
        let lookups = Arc::new(Mutex::new(0));
        adapter.add_delegate(Arc::new(Flicker {
            hits: hits.clone(),
            lookups: lookups.clone(),
            updated: Signal::new(),
        }));

        let rows = fruits();
        adapter.get_text(Some(&rows), 0, 0);
        adapter.get_text(Some(&rows), 0, 0);

        // Both calls invoked the handler *and* went through resolution again.
        assert_eq!(*hits.lock(), 2);
        assert_eq!(*lookups.lock(), 2);
    }

    #[test]
    fn test_set_text_fallback_writes_cell() {
        let adapter = TabularAdapter::new(fruit_columns());
        let mut rows = fruits();
        adapter.set_text(&mut rows, 0, 0, "quince").unwrap();
        assert_eq!(rows[0].name, "quince");
    }

    #[test]
    fn test_set_text_coercion_error_propagates() {
        let adapter = TabularAdapter::new(fruit_columns());
        let mut rows = fruits();
        let err = adapter.set_text(&mut rows, 0, 1, "not-a-number").unwrap_err();
        assert!(matches!(err, CommitError::Invalid { .. }));
        // The model value is unchanged.
        assert_eq!(rows[0].count, 3);
    }

    #[test]
    fn test_set_text_out_of_range() {
        let adapter = TabularAdapter::new(fruit_columns());
        let mut rows = fruits();
        assert!(matches!(
            adapter.set_text(&mut rows, 9, 0, "x"),
            Err(CommitError::OutOfRange { row: 9 })
        ));
    }

    #[test]
    fn test_width_and_allocation() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        adapter.on_column("name", Operation::Width, |_| CellValue::Float(120.0));
        adapter.on_column("count", Operation::Width, |_| CellValue::Float(0.5));

        let rows = fruits();
        assert_eq!(adapter.get_width(Some(&rows), 0), 120.0);

        let widths = adapter.allocate(Some(&rows), 500.0, &[]);
        assert_eq!(widths[0], 120.0);
        assert_eq!(widths[1], 380.0);
    }

    #[test]
    fn test_cleanup_disconnects_delegates() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        let delegate = Arc::new(DelegateBase::new());
        adapter.add_delegate(delegate.clone());
        assert_eq!(delegate.updated().connection_count(), 1);

        adapter.cleanup();
        assert_eq!(delegate.updated().connection_count(), 0);
        assert!(adapter.delegates().is_empty());
    }

    #[test]
    fn test_can_edit_fallback_tracks_flag() {
        let mut adapter = TabularAdapter::new(fruit_columns());
        let rows = fruits();
        assert!(adapter.get_can_edit(Some(&rows), 0, 0));

        adapter.set_can_edit(false);
        assert!(!adapter.get_can_edit(Some(&rows), 0, 0));
    }

    #[test]
    fn test_dropped_fallback_echoes_value() {
        let adapter = TabularAdapter::new(fruit_columns());
        let rows = fruits();
        let value = CellValue::from("payload");
        assert_eq!(adapter.get_dropped(Some(&rows), 0, 0, &value), value);
        assert!(!adapter.get_can_drop(Some(&rows), 0, 0, &value));
    }
}
