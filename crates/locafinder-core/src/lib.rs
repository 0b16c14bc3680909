//! Core systems for Locafinder.
//!
//! This crate provides the small reactive foundation the map and filtering
//! layers are built on:
//!
//! - **Signal/Slot System**: Type-safe notification between components
//! - **Property System**: Reactive values with change detection
//! - **Request Sequencing**: Monotonic tokens that let only the newest
//!   asynchronous response win
//! - **Logging**: Target names and performance spans for `tracing`
//!
//! # Signal/Slot Example
//!
//! ```
//! use locafinder_core::Signal;
//!
//! let filter_changed = Signal::<usize>::new();
//!
//! let conn_id = filter_changed.connect(|count| {
//!     println!("{} points match", count);
//! });
//!
//! filter_changed.emit(3);
//! filter_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use locafinder_core::{Property, Signal};
//!
//! struct Zoom {
//!     level: Property<f64>,
//!     level_changed: Signal<f64>,
//! }
//!
//! impl Zoom {
//!     fn set_level(&self, level: f64) {
//!         if self.level.set(level) {
//!             self.level_changed.emit(level);
//!         }
//!     }
//! }
//!
//! let zoom = Zoom { level: Property::new(12.5), level_changed: Signal::new() };
//! zoom.set_level(15.0);
//! assert_eq!(zoom.level.get(), 15.0);
//! ```
//!
//! # Request Sequencing Example
//!
//! ```
//! use locafinder_core::RequestSequence;
//!
//! let sequence = RequestSequence::new();
//! let first = sequence.next();
//! let second = sequence.next();
//!
//! assert!(!sequence.is_current(first));
//! assert!(sequence.is_current(second));
//! ```

pub mod logging;
pub mod property;
pub mod sequence;
pub mod signal;

pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use sequence::{RequestSequence, RequestToken};
pub use signal::{ConnectionId, Signal};
