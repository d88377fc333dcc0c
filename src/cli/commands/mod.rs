//! CLI command implementations.

pub mod account;
pub mod indicators;
pub mod trade;
pub mod validate;

use anyhow::{Context, Result};
use papertrade_config::AppConfig;
use papertrade_ledger::{JsonFileStore, PortfolioLedger};
use papertrade_monitor::LoggingObserver;
use std::sync::Arc;

/// Open the configured account with a logging observer attached.
pub(crate) fn open_ledger(config: &AppConfig) -> Result<PortfolioLedger> {
    let store = Arc::new(JsonFileStore::new(&config.ledger.storage_dir));
    let ledger = PortfolioLedger::open(&config.ledger.account_id, config.ledger.default_cash, store)
        .with_context(|| {
            format!(
                "Failed to open account '{}' in {}",
                config.ledger.account_id,
                config.ledger.storage_dir.display()
            )
        })?;
    ledger.subscribe(Arc::new(LoggingObserver::new(&config.ledger.account_id)));
    Ok(ledger)
}

/// Fail the command if the last accepted change was not saved.
pub(crate) fn ensure_persisted(ledger: &PortfolioLedger) -> Result<()> {
    match ledger.last_persist_error() {
        Some(e) => anyhow::bail!("Account change applied but not saved: {e}"),
        None => Ok(()),
    }
}
