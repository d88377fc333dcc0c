//! Core data types for the paper-trading simulator.

mod account;
mod ohlcv;
mod order;
mod position;

pub use account::{
    AccountSnapshot, LedgerCommand, OrderOutcome, Outcome, SnapshotRecord, Transition,
    DEFAULT_CASH,
};
pub use ohlcv::{closes, Bar};
pub use order::{normalize_symbol, Order, OrderRequest, OrderStamp, Side};
pub use position::Position;
