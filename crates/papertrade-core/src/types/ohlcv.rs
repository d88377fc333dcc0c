//! OHLCV (Open, High, Low, Close, Volume) bar type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar of market history.
///
/// Prices stay `f64` for indicator math; money in the ledger is `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume (non-negative)
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// True when every price and the volume are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Extract close prices, preserving bar order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(day(2), 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.range() - 15.0).abs() < 0.001);
        assert!(bar.is_bullish());
        assert!(bar.is_finite());
    }

    #[test]
    fn test_bar_not_finite() {
        let bar = Bar::new(day(2), 100.0, f64::INFINITY, 95.0, 105.0, 10.0);
        assert!(!bar.is_finite());

        let bar = Bar::new(day(2), 100.0, 101.0, 95.0, f64::NAN, 10.0);
        assert!(!bar.is_finite());
    }

    #[test]
    fn test_closes() {
        let bars = vec![
            Bar::new(day(1), 100.0, 101.0, 99.0, 100.5, 1000.0),
            Bar::new(day(2), 100.5, 102.0, 100.0, 101.5, 2000.0),
        ];
        assert_eq!(closes(&bars), vec![100.5, 101.5]);
    }

    #[test]
    fn test_bar_serde_date_format() {
        let bar = Bar::new(day(15), 1.0, 2.0, 0.5, 1.5, 10.0);
        let json = serde_json::to_string(&bar).unwrap();
        assert!(json.contains("\"date\":\"2024-01-15\""));
        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }
}
