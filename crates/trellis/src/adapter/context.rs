//! Per-resolution context passed to handlers.
//!
//! Each resolution builds a fresh context bundle immediately before invoking
//! a handler; the bundle is not meaningful outside that single call. This is
//! the transient row/column/item/value state of the resolution protocol made
//! explicit as an argument instead of adapter fields, so a cached handler can
//! be replayed against any later context without re-resolving.

use std::sync::Arc;

use crate::error::CommitError;

use super::row::RowItem;
use super::value::CellValue;

/// Everything a query handler may consult about the cell being resolved.
pub struct CellContext<'a> {
    /// The item being rendered.
    pub item: &'a dyn RowItem,
    /// The row index within the source.
    pub row: usize,
    /// The column index within the adapter's column set.
    pub column: usize,
    /// The resolved column id (a name, or the decimal index for unnamed
    /// columns).
    pub column_id: &'a str,
    /// The incoming value for value-carrying queries (can-drop, dropped).
    pub value: Option<&'a CellValue>,
}

/// The context for committing an edited value.
///
/// The target item is passed to the handler separately (mutably), so the
/// context itself stays borrow-free.
pub struct CommitContext<'a> {
    /// The row index within the source.
    pub row: usize,
    /// The column index within the adapter's column set.
    pub column: usize,
    /// The resolved column id.
    pub column_id: &'a str,
    /// The value being committed.
    pub value: &'a CellValue,
}

/// A resolved query handler.
///
/// Returns a neutral [`CellValue`] token; queries never fail. Handlers are
/// reference-counted so the resolution cache can hand the same resolved
/// handler back for every later query of its triple.
pub type QueryFn = Arc<dyn Fn(&CellContext<'_>) -> CellValue + Send + Sync>;

/// A resolved commit handler.
///
/// The only fallible handler kind: a coercion failure propagates to the
/// widget layer unchanged.
pub type CommitFn =
    Arc<dyn Fn(&mut dyn RowItem, &CommitContext<'_>) -> Result<(), CommitError> + Send + Sync>;
