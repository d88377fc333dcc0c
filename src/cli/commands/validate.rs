//! Validate configuration command.

use anyhow::Result;
use papertrade_config::load_config;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating default configuration and environment overrides"),
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("{}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Account: {}", config.ledger.account_id);
    println!("Default cash: ${}", config.ledger.default_cash);
    println!("Storage: {}", config.ledger.storage_dir.display());
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}
