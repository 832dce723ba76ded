//! Reactive state
//!
//! - **history**: bounded FIFO sequence of readings
//! - **reactive**: `ReactiveStore`, record/snapshot/subscribe
//!
//! ```rust
//! use live_dashboard::reading::Reading;
//! use live_dashboard::store::ReactiveStore;
//!
//! let mut store = ReactiveStore::new(3);
//! store.subscribe(|snapshot| println!("{} readings", snapshot.history.len()));
//!
//! for value in [10.0, 20.0, 30.0, 40.0] {
//!     store.record(Reading::new(value));
//! }
//!
//! let values: Vec<f64> = store.snapshot().history.iter().map(|r| r.value()).collect();
//! assert_eq!(values, vec![20.0, 30.0, 40.0]);
//! ```

pub mod history;
pub mod reactive;

pub use history::History;
pub use reactive::{ReactiveStore, Snapshot, StoreState, SubscriptionId};
