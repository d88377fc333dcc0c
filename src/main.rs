//! Paper-trading simulator CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use papertrade_config::load_config;
use papertrade_monitor::setup_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Reports its own load errors
    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(cli.config.as_deref());
    }

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // Setup logging; command-line flags win over the config file
    let log_level = match cli.log_level {
        Some(level) => level.as_str().to_string(),
        None => config.logging.level.clone(),
    };
    let _guard = setup_logging(
        &log_level,
        cli.json_logs || config.logging.is_json(),
        config.logging.file.as_deref(),
    )
    .context("Failed to set up logging")?;

    // Execute command
    match cli.command {
        Commands::Indicators(args) => cli::commands::indicators::run(args, &config),
        Commands::Account => cli::commands::account::show(&config),
        Commands::Orders => cli::commands::account::orders(&config),
        Commands::Buy(args) => cli::commands::trade::buy(args, &config),
        Commands::Sell(args) => cli::commands::trade::sell(args, &config),
        Commands::Close { symbol } => cli::commands::trade::close(&symbol, &config),
        Commands::Reset => cli::commands::account::reset(&config),
        Commands::SetSize { amount } => cli::commands::account::set_size(amount, &config),
        Commands::ValidateConfig => Ok(()),
    }
}
