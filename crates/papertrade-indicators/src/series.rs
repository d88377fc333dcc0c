//! The full chart indicator set computed from one slice of bars.

use chrono::NaiveDate;
use papertrade_core::types::{closes, Bar};
use serde::{Deserialize, Serialize};

use crate::momentum::{compute_macd, compute_rsi, MacdSeries};
use crate::moving_average::{compute_ema, compute_sma};
use crate::volume::compute_vwap;

/// Lookback periods for the chart indicators. MACD always uses 12/26/9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema: usize,
    pub rsi: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            ema: 20,
            rsi: 14,
        }
    }
}

/// Indicator series aligned index-for-index with the input bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub settings: IndicatorSettings,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma_fast: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
    pub ema: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub vwap: Vec<Option<f64>>,
}

/// One index of a [`DerivedSeries`], for tabular output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
    pub vwap: Option<f64>,
}

impl DerivedSeries {
    /// Compute every chart indicator. Bars are used in the order given.
    pub fn compute(bars: &[Bar], settings: &IndicatorSettings) -> Self {
        let close = closes(bars);

        Self {
            settings: *settings,
            dates: bars.iter().map(|b| b.date).collect(),
            sma_fast: compute_sma(&close, settings.sma_fast),
            sma_slow: compute_sma(&close, settings.sma_slow),
            ema: compute_ema(&close, settings.ema),
            rsi: compute_rsi(&close, settings.rsi),
            macd: compute_macd(&close),
            vwap: compute_vwap(bars),
            close,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Values at one index, or `None` past the end of any column.
    pub fn row(&self, index: usize) -> Option<SeriesRow> {
        Some(SeriesRow {
            date: *self.dates.get(index)?,
            close: *self.close.get(index)?,
            sma_fast: *self.sma_fast.get(index)?,
            sma_slow: *self.sma_slow.get(index)?,
            ema: *self.ema.get(index)?,
            rsi: *self.rsi.get(index)?,
            macd: *self.macd.macd.get(index)?,
            signal: *self.macd.signal.get(index)?,
            histogram: *self.macd.histogram.get(index)?,
            vwap: *self.vwap.get(index)?,
        })
    }

    /// The last `count` rows, oldest first.
    pub fn tail(&self, count: usize) -> Vec<SeriesRow> {
        let start = self.len().saturating_sub(count);
        (start..self.len()).filter_map(|i| self.row(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bars(count: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.2).sin() * 5.0;
                Bar::new(
                    start + Duration::days(i as i64),
                    close - 0.5,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1_000.0 + i as f64,
                )
            })
            .collect()
    }

    #[test]
    fn test_series_aligned_with_bars() {
        let input = bars(80);
        let series = DerivedSeries::compute(&input, &IndicatorSettings::default());

        assert_eq!(series.len(), 80);
        for column in [
            &series.sma_fast,
            &series.sma_slow,
            &series.ema,
            &series.rsi,
            &series.macd.macd,
            &series.vwap,
        ] {
            assert_eq!(column.len(), 80);
        }
        assert!(series.sma_fast[18].is_none());
        assert!(series.sma_fast[19].is_some());
        assert!(series.sma_slow[48].is_none());
        assert!(series.sma_slow[49].is_some());
        assert!(series.rsi[13].is_none());
        assert!(series.rsi[14].is_some());
        assert_eq!(series.ema[0], Some(input[0].close));
    }

    #[test]
    fn test_custom_settings() {
        let settings = IndicatorSettings {
            sma_fast: 2,
            sma_slow: 3,
            ema: 2,
            rsi: 2,
        };
        let series = DerivedSeries::compute(&bars(5), &settings);
        assert!(series.sma_fast[1].is_some());
        assert!(series.sma_slow[2].is_some());
        assert!(series.rsi[2].is_some());
        assert_eq!(series.settings, settings);
    }

    #[test]
    fn test_empty_series() {
        let series = DerivedSeries::compute(&[], &IndicatorSettings::default());
        assert!(series.is_empty());
        assert!(series.row(0).is_none());
        assert!(series.tail(5).is_empty());
    }

    #[test]
    fn test_tail_rows() {
        let input = bars(30);
        let series = DerivedSeries::compute(&input, &IndicatorSettings::default());
        let rows = series.tail(3);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].date, input[29].date);
        assert_eq!(rows[0].date, input[27].date);
        assert_eq!(series.tail(100).len(), 30);
    }

    #[test]
    fn test_row_with_short_column_is_none() {
        let mut series = DerivedSeries::compute(&bars(10), &IndicatorSettings::default());
        series.vwap.truncate(8);
        series.macd.signal.clear();

        assert!(series.row(9).is_none());
        assert!(series.row(0).is_none());
        assert!(series.tail(3).is_empty());
    }

    #[test]
    fn test_deserialized_ragged_series_does_not_panic() {
        let series = DerivedSeries::compute(&bars(4), &IndicatorSettings::default());
        let mut json = serde_json::to_value(&series).unwrap();
        json["rsi"] = serde_json::json!([null]);
        let series: DerivedSeries = serde_json::from_value(json).unwrap();

        assert!(series.row(0).is_some());
        assert!(series.row(3).is_none());
        assert_eq!(series.tail(4).len(), 1);
    }

    #[test]
    fn test_series_serializes_warmup_as_null() {
        let series = DerivedSeries::compute(&bars(3), &IndicatorSettings::default());
        let json = serde_json::to_value(&series).unwrap();
        assert!(json["sma_fast"][0].is_null());
        assert_eq!(json["dates"][0], "2024-01-01");
    }
}
