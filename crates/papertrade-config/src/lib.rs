//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LedgerSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `PAPERTRADE__LEDGER__DEFAULT_CASH`.
pub const ENV_PREFIX: &str = "PAPERTRADE";

/// Load configuration from an optional file and the environment.
///
/// Every field has a default, so `None` yields the defaults plus any
/// environment overrides. A path that is given must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
