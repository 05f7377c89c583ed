//! Signal/slot system for Trellis.
//!
//! This module provides a type-safe signal/slot mechanism for change
//! notification. Signals are emitted by objects when their state changes, and
//! connected slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Delivery
//!
//! Emission is always synchronous: every connected slot runs in the emitting
//! thread before `emit` returns. The Trellis engines are built for a
//! single-threaded cooperative host, so there is no queued or cross-thread
//! delivery and no re-entrancy protection beyond blocking.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let columns_changed = Signal::<usize>::new();
//!
//! let conn_id = columns_changed.connect(|count| {
//!     println!("now {} columns", count);
//! });
//!
//! columns_changed.emit(3);
//! columns_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with the
/// provided arguments, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(String, i32)` for multiple
///   arguments.
///
/// # Related Types
///
/// - [`ConnectionId`] - Returned by [`connect`](Self::connect), used to disconnect
/// - [`ConnectionGuard`] - RAII-style connection that auto-disconnects on drop
/// - [`crate::Property`] - Often paired with signals for change notification
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use trellis_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let connection = Connection {
            slot: Arc::new(slot),
        };
        self.connections.lock().insert(connection)
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. This is useful during
    /// initialization or batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    ///
    /// If the signal is blocked, this does nothing. Slots run synchronously
    /// in the emitting thread, in connection order.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        // Clone the slot handles out so a slot can connect/disconnect
        // without deadlocking on the connection table.
        let slots: Vec<_> = {
            let connections = self.connections.lock();
            tracing::trace!(
                target: targets::SIGNAL,
                connection_count = connections.len(),
                "emitting signal"
            );
            connections.iter().map(|(_, c)| c.slot.clone()).collect()
        };

        for slot in slots {
            slot(&args);
        }
    }
}

/// An RAII guard that disconnects a signal connection when dropped.
///
/// Use [`ConnectionGuard::new`] to tie a connection's lifetime to a scope or
/// an owning struct; the connection is removed automatically on drop.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trellis_core::{ConnectionGuard, Signal};
///
/// let signal = Arc::new(Signal::<i32>::new());
/// {
///     let id = signal.connect(|n| println!("{}", n));
///     let _guard = ConnectionGuard::new(signal.clone(), id);
///     signal.emit(1); // slot runs
/// }
/// signal.emit(2); // slot already disconnected
/// assert_eq!(signal.connection_count(), 0);
/// ```
pub struct ConnectionGuard<Args> {
    signal: Arc<Signal<Args>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// Create a guard that disconnects `id` from `signal` on drop.
    pub fn new(signal: Arc<Signal<Args>>, id: ConnectionId) -> Self {
        Self { signal, id }
    }

    /// The guarded connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv = received.clone();
        signal.connect(move |n| recv.lock().push(*n));

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1, 2]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let counter = Arc::new(Mutex::new(0));

        let c = counter.clone();
        let id = signal.connect(move |_| *c.lock() += 1);

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(*counter.lock(), 1);
    }

    #[test]
    fn test_multiple_slots_run_in_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = order.clone();
        signal.connect(move |_| o1.lock().push("first"));
        let o2 = order.clone();
        signal.connect(move |_| o2.lock().push("second"));

        signal.emit(());
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_blocked_signal_skips_emit() {
        let signal = Signal::<()>::new();
        let counter = Arc::new(Mutex::new(0));

        let c = counter.clone();
        signal.connect(move |_| *c.lock() += 1);

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(*counter.lock(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(*counter.lock(), 1);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Arc::new(Signal::<()>::new());
        let counter = Arc::new(Mutex::new(0));

        {
            let c = counter.clone();
            let id = signal.connect(move |_| *c.lock() += 1);
            let _guard = ConnectionGuard::new(signal.clone(), id);
            signal.emit(());
        }

        signal.emit(());
        assert_eq!(*counter.lock(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});
        assert_eq!(signal.connection_count(), 2);

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }
}
