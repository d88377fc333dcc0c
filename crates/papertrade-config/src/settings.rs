//! Configuration structures.

use papertrade_core::error::{PaperTradeError, PaperTradeResult};
use papertrade_core::types::DEFAULT_CASH;
use papertrade_indicators::IndicatorSettings;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "papertrade".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Key the snapshot is stored under
    pub account_id: String,
    /// Cash for a new or reset account
    pub default_cash: Decimal,
    /// Directory holding `<account_id>.json`
    pub storage_dir: PathBuf,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            account_id: "portfolio".to_string(),
            default_cash: DEFAULT_CASH,
            storage_dir: PathBuf::from(".papertrade"),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AppConfig {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> PaperTradeResult<()> {
        if self.app.name.trim().is_empty() {
            return Err(invalid("app.name must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid(format!(
                "logging.level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "pretty" | "json") {
            return Err(invalid(format!(
                "logging.format must be pretty or json, got {:?}",
                self.logging.format
            )));
        }

        let id = &self.ledger.account_id;
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(format!(
                "ledger.account_id may only contain letters, digits, '-' and '_', got {id:?}"
            )));
        }
        if self.ledger.default_cash < Decimal::ZERO {
            return Err(invalid(format!(
                "ledger.default_cash must not be negative, got {}",
                self.ledger.default_cash
            )));
        }

        let periods = [
            ("indicators.sma_fast", self.indicators.sma_fast),
            ("indicators.sma_slow", self.indicators.sma_slow),
            ("indicators.ema", self.indicators.ema),
            ("indicators.rsi", self.indicators.rsi),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(invalid(format!("{name} must be at least 1")));
        }

        Ok(())
    }

    /// Render as TOML, e.g. to show the effective configuration.
    pub fn to_toml(&self) -> PaperTradeResult<String> {
        toml::to_string_pretty(self).map_err(|e| PaperTradeError::Serialization(e.to_string()))
    }
}

fn invalid(message: impl Into<String>) -> PaperTradeError {
    PaperTradeError::Config(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.account_id, "portfolio");
        assert_eq!(config.ledger.default_cash, dec!(100000));
        assert_eq!(config.ledger.storage_dir, PathBuf::from(".papertrade"));
        assert_eq!(config.indicators, IndicatorSettings::default());
        assert!(!config.logging.is_json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.ledger.default_cash = dec!(-1);
        assert!(matches!(config.validate(), Err(PaperTradeError::Config(_))));

        let mut config = AppConfig::default();
        config.indicators.rsi = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("indicators.rsi"));

        let mut config = AppConfig::default();
        config.ledger.account_id = "../other".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[ledger]"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.ledger.default_cash, dec!(100000));
        assert_eq!(parsed.indicators.rsi, 14);
    }
}
