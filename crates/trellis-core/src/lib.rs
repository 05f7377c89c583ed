//! Core systems for Trellis.
//!
//! This crate provides the foundational components shared by the Trellis
//! view-binding engines:
//!
//! - **Signal/Slot System**: Type-safe observer notifications
//! - **Property System**: Value cells with change detection
//! - **Error Types**: The core error taxonomy
//! - **Logging Targets**: `tracing` target constants for per-subsystem filtering
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a cache is flushed
//! let cache_flushed = Signal::<()>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = cache_flushed.connect(|_| {
//!     println!("cache flushed, re-query everything");
//! });
//!
//! // Emit the signal
//! cache_flushed.emit(());
//!
//! // Disconnect when done
//! cache_flushed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use trellis_core::{Property, Signal};
//!
//! // A reactive flag with change notification
//! struct AcceptsFlag {
//!     value: Property<bool>,
//!     updated: Signal<()>,
//! }
//!
//! impl AcceptsFlag {
//!     fn set(&self, accepts: bool) {
//!         if self.value.set(accepts) {
//!             self.updated.emit(());
//!         }
//!     }
//! }
//! ```
//!
//! # Threading
//!
//! The Trellis engines target a single-threaded, cooperative, event-driven
//! host. Signals here are emitted synchronously in the calling thread; there
//! is no queued or cross-thread delivery.

pub mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{CoreError, Result, SignalError};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
