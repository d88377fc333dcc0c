//! Account snapshot and the ledger reducer.
//!
//! Every mutation of a simulated account goes through
//! [`AccountSnapshot::apply`], a pure transition from one consistent snapshot
//! to the next. Persistence and observer notification live in the ledger
//! crate and wrap this reducer; nothing here performs I/O.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{normalize_symbol, Order, OrderRequest, OrderStamp, Position, Side};
use crate::error::{RejectReason, StorageError};

/// Starting cash for a fresh account.
pub const DEFAULT_CASH: Decimal = dec!(100000);

/// Cash, open positions and order history of one simulated account.
///
/// Invariants, upheld by every constructor and transition:
/// - `cash >= 0`
/// - one position per symbol, each with a positive quantity
/// - `equity == cash + sum(quantity * avg_price)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord", into = "SnapshotRecord")]
pub struct AccountSnapshot {
    cash: Decimal,
    positions: Vec<Position>,
    orders: Vec<Order>,
    equity: Decimal,
}

/// A state change requested of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Start over with the given cash baseline.
    Reset { cash: Decimal },
    /// Start over with `max(size, 0)` cash.
    SetAccountSize(Decimal),
    /// Execute a buy or sell.
    Submit(OrderRequest),
    /// Sell the full holding at its average cost.
    ClosePosition(String),
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The snapshot was replaced wholesale (reset / account size).
    Replaced,
    /// An order executed and was appended to the history.
    Executed(Order),
    /// Nothing changed.
    Rejected(RejectReason),
}

/// Outcome of an order submission as reported to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Accepted(Order),
    Rejected(RejectReason),
}

impl OrderOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, OrderOutcome::Accepted(_))
    }
}

/// Result of applying a command: the next snapshot and what happened.
#[derive(Debug, Clone)]
pub struct Transition {
    pub snapshot: AccountSnapshot,
    pub outcome: Outcome,
}

impl Transition {
    /// True unless the command was rejected.
    pub fn changed(&self) -> bool {
        !matches!(self.outcome, Outcome::Rejected(_))
    }
}

impl Default for AccountSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_CASH)
    }
}

impl AccountSnapshot {
    /// Fresh account holding only cash. Negative amounts clamp to zero.
    pub fn new(cash: Decimal) -> Self {
        let cash = cash.max(Decimal::ZERO);
        Self {
            cash,
            positions: Vec::new(),
            orders: Vec::new(),
            equity: cash,
        }
    }

    /// Available cash.
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Cash plus the cost basis of every open position.
    pub fn equity(&self) -> Decimal {
        self.equity
    }

    /// Open positions in the order they were opened.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Executed orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Executed orders, newest first (trade log order).
    pub fn orders_newest_first(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().rev()
    }

    /// Look up a position; the symbol is normalized first.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        let symbol = normalize_symbol(symbol);
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Number of open positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Sum of `quantity * avg_price` over open positions.
    pub fn total_cost_basis(&self) -> Decimal {
        self.equity - self.cash
    }

    /// Apply a command, returning the next snapshot and the outcome.
    ///
    /// `stamp` supplies the id and timestamp for an executed order and is
    /// ignored otherwise. A rejected command yields an identical snapshot.
    pub fn apply(&self, command: &LedgerCommand, stamp: OrderStamp) -> Transition {
        let result = match command {
            LedgerCommand::Reset { cash } => Ok((Self::new(*cash), Outcome::Replaced)),
            LedgerCommand::SetAccountSize(size) => Ok((Self::new(*size), Outcome::Replaced)),
            LedgerCommand::Submit(request) => self
                .execute(request, stamp)
                .map(|(next, order)| (next, Outcome::Executed(order))),
            LedgerCommand::ClosePosition(symbol) => self
                .close_request(symbol)
                .and_then(|request| self.execute(&request, stamp))
                .map(|(next, order)| (next, Outcome::Executed(order))),
        };

        match result {
            Ok((snapshot, outcome)) => Transition { snapshot, outcome },
            Err(reason) => Transition {
                snapshot: self.clone(),
                outcome: Outcome::Rejected(reason),
            },
        }
    }

    /// Build the full-quantity sell at average cost for `symbol`.
    fn close_request(&self, symbol: &str) -> Result<OrderRequest, RejectReason> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(RejectReason::EmptySymbol);
        }
        let position = self
            .positions
            .iter()
            .find(|p| p.symbol == symbol)
            .ok_or_else(|| RejectReason::NoPosition(symbol.clone()))?;

        Ok(OrderRequest::sell(symbol, position.quantity, position.avg_price))
    }

    fn execute(
        &self,
        request: &OrderRequest,
        stamp: OrderStamp,
    ) -> Result<(Self, Order), RejectReason> {
        let symbol = normalize_symbol(&request.symbol);
        if symbol.is_empty() {
            return Err(RejectReason::EmptySymbol);
        }
        if request.quantity == 0 {
            return Err(RejectReason::ZeroQuantity);
        }
        if request.price <= Decimal::ZERO {
            return Err(RejectReason::NonPositivePrice(request.price));
        }

        let notional = Decimal::from(request.quantity)
            .checked_mul(request.price)
            .ok_or(RejectReason::ArithmeticOverflow)?;

        let mut next = self.clone();
        let index = next.positions.iter().position(|p| p.symbol == symbol);

        match request.side {
            Side::Buy => {
                if notional > next.cash {
                    return Err(RejectReason::InsufficientFunds {
                        required: notional,
                        available: next.cash,
                    });
                }
                next.cash -= notional;

                match index {
                    None => next.positions.push(Position {
                        symbol: symbol.clone(),
                        quantity: request.quantity,
                        avg_price: request.price,
                        stop_loss: request.stop_loss,
                        take_profit: request.take_profit,
                    }),
                    Some(i) => {
                        let existing = &mut next.positions[i];
                        let quantity = existing
                            .quantity
                            .checked_add(request.quantity)
                            .ok_or(RejectReason::ArithmeticOverflow)?;
                        let avg_price = Decimal::from(existing.quantity)
                            .checked_mul(existing.avg_price)
                            .and_then(|cost| cost.checked_add(notional))
                            .and_then(|total| total.checked_div(Decimal::from(quantity)))
                            .ok_or(RejectReason::ArithmeticOverflow)?;

                        existing.quantity = quantity;
                        existing.avg_price = avg_price;
                        if request.stop_loss.is_some() {
                            existing.stop_loss = request.stop_loss;
                        }
                        if request.take_profit.is_some() {
                            existing.take_profit = request.take_profit;
                        }
                    }
                }
            }
            Side::Sell => {
                let i = index.ok_or_else(|| RejectReason::NoPosition(symbol.clone()))?;
                let held = next.positions[i].quantity;
                if held < request.quantity {
                    return Err(RejectReason::Oversell {
                        symbol,
                        held,
                        requested: request.quantity,
                    });
                }
                next.cash = next
                    .cash
                    .checked_add(notional)
                    .ok_or(RejectReason::ArithmeticOverflow)?;

                let remaining = held - request.quantity;
                if remaining == 0 {
                    next.positions.remove(i);
                } else {
                    next.positions[i].quantity = remaining;
                }
            }
        }

        let order = Order {
            id: stamp.id,
            timestamp: stamp.timestamp,
            symbol,
            quantity: request.quantity,
            price: request.price,
            side: request.side,
        };
        next.orders.push(order.clone());
        next.equity = compute_equity(next.cash, &next.positions)
            .ok_or(RejectReason::ArithmeticOverflow)?;

        Ok((next, order))
    }
}

/// `cash + sum(quantity * avg_price)`, or `None` on overflow.
fn compute_equity(cash: Decimal, positions: &[Position]) -> Option<Decimal> {
    positions.iter().try_fold(cash, |acc, p| {
        Decimal::from(p.quantity)
            .checked_mul(p.avg_price)
            .and_then(|value| acc.checked_add(value))
    })
}

/// Persisted form of [`AccountSnapshot`].
///
/// `equity` is written for readers of the file but recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub cash: Decimal,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub equity: Decimal,
}

impl From<AccountSnapshot> for SnapshotRecord {
    fn from(snapshot: AccountSnapshot) -> Self {
        Self {
            cash: snapshot.cash,
            positions: snapshot.positions,
            orders: snapshot.orders,
            equity: snapshot.equity,
        }
    }
}

impl TryFrom<SnapshotRecord> for AccountSnapshot {
    type Error = StorageError;

    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        if record.cash < Decimal::ZERO {
            return Err(StorageError::Corrupt(format!(
                "negative cash {}",
                record.cash
            )));
        }

        let mut seen = HashSet::new();
        for position in &record.positions {
            if position.symbol.is_empty() || position.symbol != normalize_symbol(&position.symbol)
            {
                return Err(StorageError::Corrupt(format!(
                    "invalid position symbol {:?}",
                    position.symbol
                )));
            }
            if position.quantity == 0 || position.avg_price <= Decimal::ZERO {
                return Err(StorageError::Corrupt(format!(
                    "position {} has quantity {} at {}",
                    position.symbol, position.quantity, position.avg_price
                )));
            }
            if !seen.insert(position.symbol.as_str()) {
                return Err(StorageError::Corrupt(format!(
                    "duplicate position {}",
                    position.symbol
                )));
            }
        }

        if let Some(order) = record
            .orders
            .iter()
            .find(|o| o.quantity == 0 || o.price <= Decimal::ZERO)
        {
            return Err(StorageError::Corrupt(format!(
                "order {} has quantity {} at {}",
                order.id, order.quantity, order.price
            )));
        }

        let equity = compute_equity(record.cash, &record.positions)
            .ok_or_else(|| StorageError::Corrupt("equity overflows".to_string()))?;
        if equity != record.equity {
            tracing::warn!(
                stored = %record.equity,
                recomputed = %equity,
                "Stored equity is stale, using recomputed value"
            );
        }

        Ok(Self {
            cash: record.cash,
            positions: record.positions,
            orders: record.orders,
            equity,
        })
    }
}
