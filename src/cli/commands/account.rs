//! Account inspection and reset commands.

use anyhow::Result;
use papertrade_config::AppConfig;
use papertrade_core::types::AccountSnapshot;
use rust_decimal::Decimal;

use super::{ensure_persisted, open_ledger};

pub fn show(config: &AppConfig) -> Result<()> {
    let ledger = open_ledger(config)?;
    print!("{}", render_account(ledger.account_id(), &ledger.snapshot()));
    Ok(())
}

pub fn orders(config: &AppConfig) -> Result<()> {
    let ledger = open_ledger(config)?;
    print!("{}", render_orders(&ledger.snapshot()));
    Ok(())
}

pub fn reset(config: &AppConfig) -> Result<()> {
    let ledger = open_ledger(config)?;
    let snapshot = ledger.reset();
    ensure_persisted(&ledger)?;
    println!("Account reset. Cash: ${}", snapshot.cash().round_dp(2));
    Ok(())
}

pub fn set_size(amount: Decimal, config: &AppConfig) -> Result<()> {
    let ledger = open_ledger(config)?;
    let snapshot = ledger.set_account_size(amount);
    ensure_persisted(&ledger)?;
    println!(
        "Account size set. Cash: ${} (positions and orders cleared)",
        snapshot.cash().round_dp(2)
    );
    Ok(())
}

pub(crate) fn render_account(account_id: &str, snapshot: &AccountSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!("Account:   {account_id}\n"));
    out.push_str(&format!("Cash:      ${}\n", snapshot.cash().round_dp(2)));
    out.push_str(&format!("Invested:  ${}\n", snapshot.total_cost_basis().round_dp(2)));
    out.push_str(&format!("Equity:    ${}\n", snapshot.equity().round_dp(2)));
    out.push('\n');

    if snapshot.positions().is_empty() {
        out.push_str("No open positions\n");
        return out;
    }

    out.push_str(&format!("Positions ({}):\n", snapshot.position_count()));
    out.push_str(&format!(
        "  {:<8} {:>8} {:>12} {:>14} {:>10} {:>10}\n",
        "SYMBOL", "QTY", "AVG PRICE", "VALUE", "STOP", "TARGET"
    ));
    for p in snapshot.positions() {
        out.push_str(&format!(
            "  {:<8} {:>8} {:>12} {:>14} {:>10} {:>10}\n",
            p.symbol,
            p.quantity,
            p.avg_price.round_dp(2),
            p.cost_basis().round_dp(2),
            level(p.stop_loss),
            level(p.take_profit),
        ));
    }
    out
}

pub(crate) fn render_orders(snapshot: &AccountSnapshot) -> String {
    if snapshot.orders().is_empty() {
        return "No orders yet\n".to_string();
    }

    let mut out = format!(
        "{:<20} {:<5} {:<8} {:>8} {:>12} {:>14}\n",
        "TIME", "SIDE", "SYMBOL", "QTY", "PRICE", "TOTAL"
    );
    for order in snapshot.orders_newest_first() {
        out.push_str(&format!(
            "{:<20} {:<5} {:<8} {:>8} {:>12} {:>14}\n",
            order.timestamp.format("%Y-%m-%d %H:%M:%S"),
            order.side,
            order.symbol,
            order.quantity,
            order.price.round_dp(2),
            order.notional().round_dp(2),
        ));
    }
    out
}

fn level(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.round_dp(2).to_string())
}
