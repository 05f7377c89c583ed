//! Trellis: the binding layer between reactive object models and GUI
//! widget toolkits.
//!
//! This crate provides the two engines every tabular or form-style editor
//! is built on:
//!
//! - **Adapter resolution** ([`adapter`]): dynamic dispatch over
//!   `(item type, column, operation)` addresses, with per-triple caching,
//!   delegated sub-adapters, and flush notifications — the machinery behind
//!   table and list editors.
//! - **View composition** ([`view`]): declarative `Group`/`Item`/`Include`
//!   templates with named splice points, predicate-gated children, and a
//!   per-session shadow materialization a layout engine consumes directly.
//!
//! The engines are independent: widget editors use both, but neither
//! depends on the other, and neither touches a toolkit — adapters return
//! neutral value tokens and shadow trees carry plain presentation fields,
//! both translated by the surrounding widget layer.
//!
//! # Threading
//!
//! Both engines target a single-threaded, cooperative, event-driven host.
//! Nothing blocks or performs I/O; all work is in-memory traversal and
//! lookup.
//!
//! # Quick Start
//!
//! ```
//! use trellis::adapter::{CellValue, Color, Column, Operation, TabularAdapter};
//!
//! let mut adapter = TabularAdapter::new(vec![
//!     Column::new("Item", "item"),
//!     Column::new("Count", "count"),
//! ]);
//!
//! // Negative counts render red.
//! adapter.on_column("count", Operation::TextColor, |ctx| {
//!     match ctx.item.cell("count").as_int() {
//!         Some(n) if n < 0 => CellValue::Color(Color::rgb(200, 40, 40)),
//!         _ => CellValue::None,
//!     }
//! });
//! ```

pub mod adapter;
pub mod error;
pub mod view;

pub use error::{CommitError, PredicateError, ViewError, ViewResult};

// Re-export the core crate the engines are built on.
pub use trellis_core;
