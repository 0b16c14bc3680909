//! Signals: many-listener notifications.
//!
//! A component owns a [`Signal`] per kind of change it publishes (a new
//! selection, a loading flag flipping, a route arriving). Listeners connect
//! closures and keep the returned [`ConnectionId`] if they need to detach.
//!
//! Slots run on the emitting thread after the connection table is unlocked,
//! so a slot may connect, disconnect or emit on the same signal. A slot
//! connected during an emission first runs on the next one.
//!
//! ```
//! use locafinder_core::Signal;
//!
//! let selected = Signal::<Option<String>>::new();
//! let id = selected.connect(|point| println!("selected {point:?}"));
//!
//! selected.emit(Some("p-1".into()));
//! assert!(selected.disconnect(id));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle to one connected slot, valid until it is disconnected.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of slots invoked with `&Args` on every [`Signal::emit`].
///
/// Use a tuple for several arguments and `()` for none.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect `slot`; it runs on every later emission until disconnected.
    pub fn connect(&self, slot: impl Fn(&Args) + Send + Sync + 'static) -> ConnectionId {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Detach one slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.slots.lock().contains_key(id)
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if slots.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_every_slot_sees_each_emission() {
        let loading = Signal::<(&'static str, bool)>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            loading.connect(move |&(kind, on)| seen.lock().push((kind, on)));
        }
        loading.emit(("predict", true));

        assert_eq!(*seen.lock(), vec![("predict", true), ("predict", true)]);
    }

    #[test]
    fn test_disconnected_slot_stops_running() {
        let signal = Signal::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let sink = total.clone();
        let id = signal.connect(move |&n| {
            sink.fetch_add(n as usize, Ordering::SeqCst);
        });
        signal.emit(2);
        assert!(signal.is_connected(id));
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(40);

        assert_eq!(total.load(Ordering::SeqCst), 2);
        assert!(!signal.is_connected(id));
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

    #[test]
    fn test_slot_may_emit_on_its_own_signal() {
        let signal = Arc::new(Signal::<u8>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let again = signal.clone();
        let counter = calls.clone();
        signal.connect(move |&depth| {
            counter.fetch_add(1, Ordering::SeqCst);
            if depth < 2 {
                again.emit(depth + 1);
            }
        });
        signal.emit(0);

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_slot_connected_during_emit_waits_for_next() {
        let signal = Arc::new(Signal::<()>::new());
        let late_calls = Arc::new(AtomicUsize::new(0));

        let target = signal.clone();
        let counter = late_calls.clone();
        signal.connect(move |_| {
            let counter = counter.clone();
            target.connect(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        signal.emit(());
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        signal.emit(());
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }
}
