//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational components the data grid is built on:
//!
//! - **Signal/Slot System**: Synchronous, single-threaded change notification
//! - **Property System**: Plain and replaying reactive values
//! - **Errors**: The [`GridError`] taxonomy for calls that must abort
//! - **Logging**: `tracing` targets, debug-dump options and perf spans
//!
//! Everything here is `!Send`: a grid and the models feeding it
//! live on one thread and every notification is delivered before the
//! mutating call returns.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{GridError, Result};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use property::{Property, ReplayProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};

static_assertions::assert_not_impl_any!(Signal<()>: Send, Sync);
static_assertions::assert_not_impl_any!(ReplayProperty<()>: Send, Sync);
