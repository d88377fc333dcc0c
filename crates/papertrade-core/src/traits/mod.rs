//! Core traits for the paper-trading simulator.

mod indicator;
mod observer;
mod store;

pub use indicator::{BarIndicator, Indicator, MultiOutputIndicator};
pub use observer::{LedgerObserver, SubscriptionId};
pub use store::SnapshotStore;
