//! Signal/slot system for Horizon Grid.
//!
//! This module provides the change-notification channel every grid model
//! publishes through. Signals are emitted by models when their state changes,
//! and connected slots (callbacks) are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Delivery
//!
//! Grid models are single-threaded and cooperative. `emit` delivers the
//! arguments to every slot connected at the time of the call, synchronously
//! and in connection order, before it returns. There is no queuing and no
//! locking.
//!
//! The set of slots is captured before the first one runs, so a slot may
//! connect or disconnect other slots (or itself) while it is being notified.
//! A slot disconnected by an earlier slot during the same emission is skipped.
//!
//! # Reentrancy
//!
//! A slot must not mutate the collection whose change it is handling. The
//! signal itself survives this, but the receiver's retained state (for
//! example a differ's previous snapshot) will no longer describe what it has
//! rendered. This is a documented constraint and is not enforced.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let text_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! // Emit the signal
//! text_changed.emit("Hello, World!".to_string());
//!
//! // Disconnect when done
//! text_changed.disconnect(conn_id);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Rc<dyn Fn(&Args)>,
    /// Monotonic sequence number, used to keep delivery in connection order
    /// even when slotmap reuses a vacated slot.
    seq: u64,
}

type ConnectionMap<Args> = SlotMap<ConnectionId, Connection<Args>>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a reference
/// to the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
pub struct Signal<Args> {
    connections: Rc<RefCell<ConnectionMap<Args>>>,
    next_seq: Cell<u64>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Rc::new(RefCell::new(SlotMap::with_key())),
            next_seq: Cell::new(0),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use horizon_grid_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + 'static,
    {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.connections.borrow_mut().insert(Connection {
            slot: Rc::new(slot),
            seq,
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` if it
    /// was already gone. Calling this repeatedly with the same ID is harmless.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.borrow_mut().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.borrow_mut().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// Returns `true` if the given connection is still live.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.borrow().contains_key(id)
    }

    /// Emit the signal, invoking all connected slots before returning.
    pub fn emit(&self, args: Args) {
        let mut slots: Vec<(u64, ConnectionId, Rc<dyn Fn(&Args)>)> = self
            .connections
            .borrow()
            .iter()
            .map(|(id, conn)| (conn.seq, id, conn.slot.clone()))
            .collect();
        slots.sort_unstable_by_key(|(seq, _, _)| *seq);

        tracing::trace!(
            target: targets::SIGNAL,
            connection_count = slots.len(),
            "emitting signal"
        );

        for (_, id, slot) in slots {
            // An earlier slot may have disconnected this one.
            if self.is_connected(id) {
                slot(&args);
            }
        }
    }

    /// Connect a slot with automatic disconnection when the guard is dropped.
    ///
    /// The guard only holds a weak reference to the signal's connection
    /// table, so it may safely outlive the signal.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            connections: Rc::downgrade(&self.connections),
            id,
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connections.borrow().len())
            .finish()
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use horizon_grid_core::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Rc::new(Cell::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = signal.connect_scoped(move |&n| {
///         counter_clone.set(counter_clone.get() + n);
///     });
///     signal.emit(42);  // counter = 42
/// }
/// signal.emit(43);  // Nothing happens - connection was dropped
/// assert_eq!(counter.get(), 42);
/// ```
pub struct ConnectionGuard<Args> {
    connections: Weak<RefCell<ConnectionMap<Args>>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The connection this guard owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Disconnect now instead of waiting for drop.
    ///
    /// Returns `true` if the connection was still live.
    pub fn disconnect(&self) -> bool {
        match self.connections.upgrade() {
            Some(connections) => connections.borrow_mut().remove(self.id).is_some(),
            None => false,
        }
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}

impl<Args> fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.borrow(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        let conn_id = signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.borrow(), vec![1]);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert!(!signal.disconnect(id));
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_every_emit_is_delivered_once() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.borrow_mut().push(value);
        });

        for value in 1..=3 {
            signal.emit(value);
        }
        signal.emit(3);

        assert_eq!(*received.borrow(), vec![1, 2, 3, 3]);
    }

    #[test]
    fn test_delivery_follows_connection_order() {
        let signal = Signal::<()>::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let ids: Vec<_> = (0..4)
            .map(|n| {
                let order = order.clone();
                signal.connect(move |_| order.borrow_mut().push(n))
            })
            .collect();

        // Vacate a slot so the next connection reuses it.
        signal.disconnect(ids[1]);
        let order_clone = order.clone();
        signal.connect(move |_| order_clone.borrow_mut().push(9));

        signal.emit(());
        assert_eq!(*order.borrow(), vec![0, 2, 3, 9]);
    }

    #[test]
    fn test_slot_may_disconnect_itself_during_emit() {
        let signal = Rc::new(Signal::<()>::new());
        let calls = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let signal_clone = Rc::downgrade(&signal);
        let calls_clone = calls.clone();
        let own_id_clone = own_id.clone();
        let id = signal.connect(move |_| {
            calls_clone.set(calls_clone.get() + 1);
            if let (Some(signal), Some(id)) = (signal_clone.upgrade(), own_id_clone.get()) {
                signal.disconnect(id);
            }
        });
        own_id.set(Some(id));

        signal.emit(());
        signal.emit(());
        assert_eq!(calls.get(), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_disconnected_mid_emit_is_skipped() {
        let signal = Rc::new(Signal::<()>::new());
        let second_called = Rc::new(Cell::new(false));
        let victim = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&signal);
        let victim_clone = victim.clone();
        signal.connect(move |_| {
            if let (Some(signal), Some(id)) = (weak.upgrade(), victim_clone.get()) {
                signal.disconnect(id);
            }
        });
        let flag = second_called.clone();
        victim.set(Some(signal.connect(move |_| flag.set(true))));

        signal.emit(());
        assert!(!second_called.get());
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();

        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        {
            let received_clone = received.clone();
            let _guard = signal.connect_scoped(move |&value| {
                received_clone.borrow_mut().push(value);
            });
            signal.emit(1);
        }

        signal.emit(2);
        assert_eq!(*received.borrow(), vec![1]);
    }

    #[test]
    fn test_connection_guard_outlives_signal() {
        let signal = Signal::<i32>::new();
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        assert!(!guard.disconnect());
        drop(guard);
    }

    #[test]
    fn test_signal_with_multiple_args() {
        let signal = Signal::<(String, i32)>::new();
        let received = Rc::new(RefCell::new(None));

        let received_clone = received.clone();
        signal.connect(move |args| {
            *received_clone.borrow_mut() = Some(args.clone());
        });

        signal.emit(("hello".to_string(), 42));
        assert_eq!(*received.borrow(), Some(("hello".to_string(), 42)));
    }
}
