//! Technical indicators for the paper-trading charts.
//!
//! Every indicator returns a series aligned index-for-index with its input,
//! with `None` where there is not yet enough history or where the input was
//! not a finite number:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volume weighted average price (VWAP)
//!
//! [`DerivedSeries`] bundles the full chart set for a slice of bars.

pub mod momentum;
pub mod moving_average;
pub mod series;
pub mod volume;

pub use momentum::{compute_macd, compute_rsi, Macd, MacdSeries, Rsi};
pub use moving_average::{compute_ema, compute_sma, Ema, Sma};
pub use series::{DerivedSeries, IndicatorSettings, SeriesRow};
pub use volume::{compute_vwap, Vwap};
