//! Order entry commands.

use anyhow::Result;
use papertrade_config::AppConfig;
use papertrade_core::types::{OrderOutcome, OrderRequest, Side};

use super::{ensure_persisted, open_ledger};
use crate::cli::TradeArgs;

pub fn buy(args: TradeArgs, config: &AppConfig) -> Result<()> {
    submit(args, Side::Buy, config)
}

pub fn sell(args: TradeArgs, config: &AppConfig) -> Result<()> {
    submit(args, Side::Sell, config)
}

pub fn close(symbol: &str, config: &AppConfig) -> Result<()> {
    let ledger = open_ledger(config)?;
    let outcome = ledger.close_position(symbol);
    println!("{}", describe(&outcome));
    ensure_persisted(&ledger)
}

fn submit(args: TradeArgs, side: Side, config: &AppConfig) -> Result<()> {
    let mut request = OrderRequest::new(args.symbol, side, args.quantity, args.price);
    request.stop_loss = args.stop_loss;
    request.take_profit = args.take_profit;

    let ledger = open_ledger(config)?;
    let outcome = ledger.submit_order(request);
    println!("{}", describe(&outcome));
    if outcome.is_accepted() {
        println!("Cash: ${}", ledger.snapshot().cash().round_dp(2));
    }
    ensure_persisted(&ledger)
}

/// One line for the terminal. Rejections are reported, not returned as errors.
pub(crate) fn describe(outcome: &OrderOutcome) -> String {
    match outcome {
        OrderOutcome::Accepted(order) => format!(
            "{} {} {} @ ${} (total ${}) [{}]",
            order.side,
            order.quantity,
            order.symbol,
            order.price.round_dp(2),
            order.notional().round_dp(2),
            order.id
        ),
        OrderOutcome::Rejected(reason) => format!("Rejected: {reason}"),
    }
}
