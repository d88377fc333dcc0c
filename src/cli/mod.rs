//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "papertrade")]
#[command(author, version, about = "Paper-trading simulator: indicators and a portfolio ledger")]
pub struct Cli {
    /// Configuration file path (defaults plus PAPERTRADE__* variables when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute chart indicators for a CSV of daily bars
    Indicators(IndicatorArgs),
    /// Show cash, equity and open positions
    Account,
    /// Show the trade log, newest first
    Orders,
    /// Buy shares
    Buy(TradeArgs),
    /// Sell shares
    Sell(TradeArgs),
    /// Sell a whole position at its average cost
    Close {
        /// Symbol to close
        symbol: String,
    },
    /// Reset the account to the default cash
    Reset,
    /// Reset the account with a new cash amount
    SetSize {
        /// Starting cash (negative values become zero)
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct IndicatorArgs {
    /// Data file (CSV with date,open,high,low,close,volume)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Only print the last N rows
    #[arg(long)]
    pub last: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct TradeArgs {
    /// Ticker symbol
    pub symbol: String,

    /// Whole shares
    pub quantity: u64,

    /// Execution price per share
    pub price: Decimal,

    /// Stop loss level to attach to the position
    #[arg(long)]
    pub stop_loss: Option<Decimal>,

    /// Take profit level to attach to the position
    #[arg(long)]
    pub take_profit: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_buy() {
        let cli = Cli::parse_from([
            "papertrade",
            "buy",
            "aapl",
            "10",
            "150.25",
            "--stop-loss",
            "140",
        ]);
        let Commands::Buy(args) = cli.command else {
            panic!("expected buy");
        };
        assert_eq!(args.symbol, "aapl");
        assert_eq!(args.quantity, 10);
        assert_eq!(args.price, dec!(150.25));
        assert_eq!(args.stop_loss, Some(dec!(140)));
        assert!(args.take_profit.is_none());
    }

    #[test]
    fn test_parse_global_flags_and_indicators() {
        let cli = Cli::parse_from([
            "papertrade",
            "--log-level",
            "debug",
            "--json-logs",
            "indicators",
            "--data",
            "bars.csv",
            "--last",
            "5",
            "--output",
            "json",
        ]);
        assert!(cli.json_logs);
        assert_eq!(cli.log_level.map(|l| l.as_str()), Some("debug"));
        let Commands::Indicators(args) = cli.command else {
            panic!("expected indicators");
        };
        assert_eq!(args.last, Some(5));
        assert!(matches!(args.output, OutputFormat::Json));
    }

    #[test]
    fn test_parse_set_size_negative() {
        let cli = Cli::parse_from(["papertrade", "set-size", "-50"]);
        assert!(matches!(cli.command, Commands::SetSize { amount } if amount == dec!(-50)));
    }

    #[test]
    fn test_negative_quantity_rejected_by_parser() {
        assert!(Cli::try_parse_from(["papertrade", "sell", "AAPL", "-1", "10"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
