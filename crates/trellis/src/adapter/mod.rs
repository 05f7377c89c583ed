//! The adapter resolution engine.
//!
//! Adapters translate opaque row/column addresses into display and edit
//! operations on arbitrary underlying items. The engine's job is dynamic
//! dispatch over `(item type, column, operation)` triples: given a query, it
//! finds the most specific handler among delegated sub-adapters, the
//! adapter's own type- and column-qualified conventions, and generic
//! fallbacks — then caches the winner so repeat queries are O(1).
//!
//! # Core Types
//!
//! - [`TabularAdapter`]: the multi-column adapter behind table editors
//! - [`ListStrAdapter`]: the single-column sibling for string lists
//! - [`Operation`]: the closed set of things a widget can ask about a cell
//! - [`CellValue`]: the neutral value tokens handlers return
//! - [`RowItem`] / [`RowSource`]: the boundary to the host model
//! - [`DelegateAdapter`] / [`DelegateBase`]: composable cross-cutting rules
//!
//! # Threading
//!
//! Adapters target a single-threaded cooperative host. Resolution mutates
//! only the internal cache (behind a lock); contexts are built and consumed
//! within one call stack.

pub mod context;
pub mod delegate;
pub mod list_str;
pub mod operation;
pub mod row;
pub mod tabular;
pub mod value;
pub mod width;

pub use context::{CellContext, CommitContext, CommitFn, QueryFn};
pub use delegate::{DelegateAdapter, DelegateBase};
pub use list_str::{ListStrAdapter, StrRowSource, LIST_COLUMN_ID};
pub use operation::Operation;
pub use row::{RowItem, RowSource};
pub use tabular::{Column, TabularAdapter};
pub use value::{Alignment, CellValue, Color};
pub use width::{allocate_widths, MIN_COLUMN_WIDTH};
