//! Logging setup and ledger observers.

mod logging;
mod observer;

pub use logging::{setup_logging, LoggingGuard};
pub use observer::LoggingObserver;
