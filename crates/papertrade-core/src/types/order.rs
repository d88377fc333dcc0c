//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Trim and uppercase a ticker. An empty result means "no symbol".
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Order request as supplied by the order-entry surface.
///
/// The ledger re-validates every field; nothing here is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade (normalized by the ledger)
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Whole shares
    pub quantity: u64,
    /// Execution price per share
    pub price: Decimal,
    /// Stop loss level to attach to the position (buys only)
    pub stop_loss: Option<Decimal>,
    /// Take profit level to attach to the position (buys only)
    pub take_profit: Option<Decimal>,
}

impl OrderRequest {
    /// Create a request for either side.
    pub fn new(symbol: impl Into<String>, side: Side, quantity: u64, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Create a buy request.
    pub fn buy(symbol: impl Into<String>, quantity: u64, price: Decimal) -> Self {
        Self::new(symbol, Side::Buy, quantity, price)
    }

    /// Create a sell request.
    pub fn sell(symbol: impl Into<String>, quantity: u64, price: Decimal) -> Self {
        Self::new(symbol, Side::Sell, quantity, price)
    }

    /// Attach a stop loss level.
    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    /// Attach a take profit level.
    pub fn with_take_profit(mut self, take_profit: Decimal) -> Self {
        self.take_profit = Some(take_profit);
        self
    }
}

/// Identity and time assigned to an order when it executes.
///
/// Kept outside the reducer so transitions stay deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStamp {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl OrderStamp {
    /// A fresh random id at the current wall-clock time.
    pub fn now() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

/// Immutable record of an executed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID
    pub id: Uuid,
    /// When the order executed
    pub timestamp: DateTime<Utc>,
    /// Symbol traded (normalized)
    pub symbol: String,
    /// Shares traded
    pub quantity: u64,
    /// Execution price per share
    pub price: Decimal,
    /// Buy or sell
    pub side: Side,
}

impl Order {
    /// Total value of the order (quantity * price).
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}
