//! Delegated sub-adapters.
//!
//! A delegated sub-adapter is consulted *before* the owning adapter's own
//! conventions, in list order, which lets cross-cutting display rules (say,
//! "every overdue row is red, whatever its type") compose without touching
//! the main adapter. A delegate that declares itself non-cacheable is
//! re-consulted on every query, supporting rules whose applicability changes
//! per call.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::adapter::{CellValue, Color, DelegateBase, Operation};
//!
//! let overdue = DelegateBase::new();
//! overdue.on(Operation::BgColor, |_ctx| {
//!     CellValue::from(Color::rgb(200, 60, 60))
//! });
//!
//! // Toggle the rule off later; the owning adapter flushes its cache once.
//! overdue.set_accepts(false);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Property, Signal};

use crate::error::CommitError;

use super::context::{CellContext, CommitContext, CommitFn, QueryFn};
use super::operation::Operation;
use super::row::RowItem;
use super::value::CellValue;

/// A sub-adapter consulted ahead of the main adapter's conventions.
///
/// Implementations expose handlers by `(column id, operation)` — a `None`
/// column id is the delegate's unqualified handler for that operation. The
/// resolver asks for the column-qualified handler first.
///
/// The [`updated`](DelegateAdapter::updated) signal is the delegate's
/// update-tagged change channel: one emission means "my configuration
/// changed", and every adapter the delegate is attached to flushes its
/// resolution cache exactly once in response.
pub trait DelegateAdapter: Send + Sync {
    /// Whether this delegate applies to the cell being resolved.
    fn accepts(&self, _ctx: &CellContext<'_>) -> bool {
        true
    }

    /// Whether a handler match from this delegate may be cached.
    ///
    /// Non-cacheable delegates are re-consulted on every query of the same
    /// triple, and a match never enters the owning adapter's cache.
    fn is_cacheable(&self) -> bool {
        true
    }

    /// Look up a query handler for `(column_id, op)`.
    fn query(&self, column_id: Option<&str>, op: Operation) -> Option<QueryFn>;

    /// Look up a commit handler for `(column_id, op)`.
    fn commit(&self, _column_id: Option<&str>, _op: Operation) -> Option<CommitFn> {
        None
    }

    /// The update-tagged change signal.
    fn updated(&self) -> &Signal<()>;
}

/// Handler lookup key: `(column id, operation)`.
type SlotKey = (Option<String>, Operation);

/// The standard delegate implementation.
///
/// Handlers are registered per operation, optionally qualified by column id.
/// The `accepts` flag is a change-detecting property: setting it to a new
/// value fires [`updated`](DelegateAdapter::updated) once, setting it to the
/// current value fires nothing. Registering or removing handlers after the
/// delegate is attached also fires `updated`, since cached resolutions may
/// now be stale.
pub struct DelegateBase {
    queries: RwLock<HashMap<SlotKey, QueryFn>>,
    commits: RwLock<HashMap<SlotKey, CommitFn>>,
    accepts: Property<bool>,
    cacheable: bool,
    updated: Signal<()>,
}

impl Default for DelegateBase {
    fn default() -> Self {
        Self::new()
    }
}

impl DelegateBase {
    /// Create a cacheable delegate that accepts every cell.
    pub fn new() -> Self {
        Self {
            queries: RwLock::new(HashMap::new()),
            commits: RwLock::new(HashMap::new()),
            accepts: Property::new(true),
            cacheable: true,
            updated: Signal::new(),
        }
    }

    /// Create a delegate whose matches are never cached.
    pub fn non_cacheable() -> Self {
        Self {
            cacheable: false,
            ..Self::new()
        }
    }

    /// Register an unqualified query handler for `op`.
    pub fn on<F>(&self, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries.write().insert((None, op), Arc::new(handler));
        self.updated.emit(());
    }

    /// Register a column-qualified query handler for `op`.
    pub fn on_column<F>(&self, column_id: impl Into<String>, op: Operation, handler: F)
    where
        F: Fn(&CellContext<'_>) -> CellValue + Send + Sync + 'static,
    {
        self.queries
            .write()
            .insert((Some(column_id.into()), op), Arc::new(handler));
        self.updated.emit(());
    }

    /// Register an unqualified commit handler for `op`.
    pub fn on_commit<F>(&self, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits.write().insert((None, op), Arc::new(handler));
        self.updated.emit(());
    }

    /// Register a column-qualified commit handler for `op`.
    pub fn on_commit_column<F>(&self, column_id: impl Into<String>, op: Operation, handler: F)
    where
        F: Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError>
            + Send
            + Sync
            + 'static,
    {
        self.commits
            .write()
            .insert((Some(column_id.into()), op), Arc::new(handler));
        self.updated.emit(());
    }

    /// Current value of the accepts flag.
    pub fn accepts_value(&self) -> bool {
        self.accepts.get()
    }

    /// Set the accepts flag; fires `updated` only on a real change.
    pub fn set_accepts(&self, accepts: bool) {
        if self.accepts.set(accepts) {
            self.updated.emit(());
        }
    }

    /// Fire `updated` manually, coalescing an external batch of changes
    /// into one notification.
    pub fn notify_updated(&self) {
        self.updated.emit(());
    }
}

impl DelegateAdapter for DelegateBase {
    fn accepts(&self, _ctx: &CellContext<'_>) -> bool {
        self.accepts.get()
    }

    fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    fn query(&self, column_id: Option<&str>, op: Operation) -> Option<QueryFn> {
        let key = (column_id.map(str::to_string), op);
        self.queries.read().get(&key).cloned()
    }

    fn commit(&self, column_id: Option<&str>, op: Operation) -> Option<CommitFn> {
        let key = (column_id.map(str::to_string), op);
        self.commits.read().get(&key).cloned()
    }

    fn updated(&self) -> &Signal<()> {
        &self.updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_column_qualified_lookup() {
        let delegate = DelegateBase::new();
        delegate.on(Operation::Text, |_| CellValue::from("generic"));
        delegate.on_column("name", Operation::Text, |_| CellValue::from("named"));

        assert!(delegate.query(Some("name"), Operation::Text).is_some());
        assert!(delegate.query(Some("other"), Operation::Text).is_none());
        assert!(delegate.query(None, Operation::Text).is_some());
        assert!(delegate.query(None, Operation::Image).is_none());
    }

    #[test]
    fn test_set_accepts_fires_updated_once_per_change() {
        let delegate = DelegateBase::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        delegate.updated().connect(move |_| *c.lock() += 1);

        delegate.set_accepts(false);
        delegate.set_accepts(false); // no change, no notification
        delegate.set_accepts(true);

        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_registration_fires_updated() {
        let delegate = DelegateBase::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        delegate.updated().connect(move |_| *c.lock() += 1);

        delegate.on(Operation::Text, |_| CellValue::None);
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_non_cacheable_flag() {
        assert!(DelegateBase::new().is_cacheable());
        assert!(!DelegateBase::non_cacheable().is_cacheable());
    }
}
