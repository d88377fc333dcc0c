//! Error types for the paper-trading simulator.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum PaperTradeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Why the ledger refused an order.
///
/// A rejection never changes the account snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Symbol is empty")]
    EmptySymbol,

    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    #[error("Price must be greater than zero, got {0}")]
    NonPositivePrice(Decimal),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("No open position in {0}")]
    NoPosition(String),

    #[error("Cannot sell {requested} {symbol}: only {held} held")]
    Oversell {
        symbol: String,
        held: u64,
        requested: u64,
    },

    #[error("Order value is outside the representable range")]
    ArithmeticOverflow,
}

/// Snapshot persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Bars out of order at row {row}: {date} does not follow {previous}")]
    Unordered {
        row: usize,
        date: chrono::NaiveDate,
        previous: chrono::NaiveDate,
    },
}

/// Result type alias for fallible operations.
pub type PaperTradeResult<T> = Result<T, PaperTradeError>;
