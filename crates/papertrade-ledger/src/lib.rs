//! Portfolio ledger for the paper-trading simulator.
//!
//! [`PortfolioLedger`] linearizes every account mutation behind one lock,
//! persists each accepted transition through a [`SnapshotStore`] and then
//! publishes it to subscribed observers.
//!
//! [`SnapshotStore`]: papertrade_core::traits::SnapshotStore

mod ledger;
mod store;

pub use ledger::PortfolioLedger;
pub use store::{JsonFileStore, MemoryStore};
