//! Core types and traits for the paper-trading simulator.
//!
//! This crate provides the foundational building blocks including:
//! - Market data bars
//! - Orders, positions and the account snapshot reducer
//! - Traits for indicators, snapshot stores and ledger observers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, PaperTradeError, PaperTradeResult, RejectReason, StorageError};
pub use traits::*;
pub use types::*;
