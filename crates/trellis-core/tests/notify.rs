//! Integration tests for the signal/property notification pattern the
//! engines rely on: change-detecting properties gating single signal
//! emissions.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{Property, Signal};

struct Flag {
    value: Property<bool>,
    changed: Signal<bool>,
}

impl Flag {
    fn new(initial: bool) -> Self {
        Self {
            value: Property::new(initial),
            changed: Signal::new(),
        }
    }

    fn set(&self, value: bool) {
        if self.value.set(value) {
            self.changed.emit(value);
        }
    }
}

#[test]
fn property_gates_signal_to_real_changes() {
    let flag = Flag::new(true);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    flag.changed.connect(move |v| sink.lock().push(*v));

    flag.set(true); // unchanged, no emission
    flag.set(false);
    flag.set(false); // unchanged, no emission
    flag.set(true);

    assert_eq!(*seen.lock(), vec![false, true]);
}

#[test]
fn disconnect_stops_delivery() {
    let signal = Signal::<i32>::new();
    let seen = Arc::new(Mutex::new(0));

    let sink = seen.clone();
    let id = signal.connect(move |n| *sink.lock() += n);

    signal.emit(1);
    signal.disconnect(id);
    signal.emit(10);

    assert_eq!(*seen.lock(), 1);
}
