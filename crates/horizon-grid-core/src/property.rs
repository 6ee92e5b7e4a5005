//! Property system for Horizon Grid.
//!
//! Properties hold a value and tell interested parties when it changes.
//!
//! # Property Types
//!
//! - **Property<T>**: A plain value cell with change detection
//! - **ReplayProperty<T>**: A published value that replays its latest state
//!   to every new subscriber, then forwards each later publish
//!
//! `ReplayProperty` is what data sources hand out from `connect()`: a viewer
//! that subscribes late still starts from the most recent slice.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::ReplayProperty;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let latest = ReplayProperty::new(vec![1, 2]);
//! latest.publish(vec![1, 2, 3]);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_clone = seen.clone();
//! latest.subscribe(move |items: &Vec<i32>| seen_clone.borrow_mut().push(items.len()));
//!
//! latest.publish(vec![]);
//! assert_eq!(*seen.borrow(), vec![3, 0]);
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::signal::{ConnectionId, Signal};

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. `set()`
/// compares the new value with the current one and reports whether it
/// actually changed, so callers only notify on real changes.
///
/// # Example
///
/// ```
/// use horizon_grid_core::Property;
///
/// let prop = Property::new(42);
/// assert_eq!(prop.get(), 42);
///
/// // Setting same value returns false (no change)
/// assert!(!prop.set(42));
///
/// // Setting different value returns true (changed)
/// assert!(prop.set(100));
/// assert_eq!(prop.get(), 100);
/// ```
pub struct Property<T> {
    value: RefCell<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.borrow())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.borrow_mut() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.borrow_mut();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.borrow_mut();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.value.borrow())
            .finish()
    }
}

/// A published value that replays its latest state to new subscribers.
///
/// Every [`publish`](Self::publish) stores the value and then emits it to
/// all current subscribers. [`subscribe`](Self::subscribe) first hands the
/// stored value to the new slot, then keeps it connected for future
/// publishes until [`unsubscribe`](Self::unsubscribe).
pub struct ReplayProperty<T> {
    value: RefCell<T>,
    published: Signal<T>,
}

impl<T: Clone + 'static> ReplayProperty<T> {
    /// Create a property holding an initial value.
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            published: Signal::new(),
        }
    }

    /// The most recently published value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Access the most recent value without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.borrow())
    }

    /// Store `value` and deliver it to every subscriber.
    pub fn publish(&self, value: T) {
        *self.value.borrow_mut() = value.clone();
        crate::grid_trace!(subscribers = self.published.connection_count(), "value published");
        self.published.emit(value);
    }

    /// Replay the current value to `slot`, then connect it for future publishes.
    pub fn subscribe<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&T) + 'static,
    {
        let current = self.get();
        slot(&current);
        self.published.connect(slot)
    }

    /// Stop delivering to a subscriber. Safe to call more than once.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        self.published.disconnect(id)
    }

    /// Drop every subscriber.
    pub fn unsubscribe_all(&self) {
        crate::grid_debug!(subscribers = self.published.connection_count(), "dropping all subscribers");
        self.published.disconnect_all();
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.published.connection_count()
    }

    /// Whether a subscriber is still connected.
    pub fn is_subscribed(&self, id: ConnectionId) -> bool {
        self.published.is_connected(id)
    }
}

impl<T: fmt::Debug> fmt::Debug for ReplayProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayProperty")
            .field("value", &*self.value.borrow())
            .field("published", &self.published)
            .finish()
    }
}
