//! Position type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A long holding in a single symbol.
///
/// Quantity is always positive; a position that reaches zero shares is
/// removed from the account rather than kept as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol (uppercase)
    pub symbol: String,
    /// Number of shares held
    pub quantity: u64,
    /// Weighted average cost per share
    pub avg_price: Decimal,
    /// Stop loss level, if one was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// Take profit level, if one was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<Decimal>,
}

impl Position {
    /// Create a new position without exit levels.
    pub fn new(symbol: impl Into<String>, quantity: u64, avg_price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            avg_price,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Cost basis (quantity * average price).
    pub fn cost_basis(&self) -> Decimal {
        Decimal::from(self.quantity) * self.avg_price
    }

    /// Profit or loss against a mark price. Display only; equity is cost based.
    pub fn unrealized_pnl(&self, mark: Decimal) -> Decimal {
        Decimal::from(self.quantity) * (mark - self.avg_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_basis() {
        let position = Position::new("AAPL", 100, dec!(150.00));
        assert_eq!(position.cost_basis(), dec!(15000.00));
    }

    #[test]
    fn test_unrealized_pnl() {
        let position = Position::new("AAPL", 100, dec!(150.00));
        assert_eq!(position.unrealized_pnl(dec!(160.00)), dec!(1000.00));
        assert_eq!(position.unrealized_pnl(dec!(145.00)), dec!(-500.00));
    }

    #[test]
    fn test_exit_levels_omitted_when_absent() {
        let position = Position::new("AAPL", 1, dec!(10));
        let json = serde_json::to_string(&position).unwrap();
        assert!(!json.contains("stop_loss"));

        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, position);
    }
}
