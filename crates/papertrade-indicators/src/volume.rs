//! Volume indicators.

use papertrade_core::traits::BarIndicator;
use papertrade_core::types::Bar;

/// Cumulative volume weighted average price from the start of the series.
///
/// Uses the typical price `(high + low + close) / 3`. The value is `None`
/// while cumulative volume is exactly zero. A bar with a non-finite field
/// or negative volume is left out of the running totals and reads `None`.
pub fn compute_vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut cumulative_pv = 0.0;
    let mut cumulative_volume = 0.0;

    bars.iter()
        .map(|bar| {
            if !bar.is_finite() || bar.volume < 0.0 {
                return None;
            }
            let pv = bar.typical_price() * bar.volume;
            if !pv.is_finite() {
                return None;
            }

            cumulative_pv += pv;
            cumulative_volume += bar.volume;
            if cumulative_volume == 0.0 {
                return None;
            }

            let vwap = cumulative_pv / cumulative_volume;
            vwap.is_finite().then_some(vwap)
        })
        .collect()
}

/// Volume Weighted Average Price (VWAP).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl BarIndicator for Vwap {
    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        compute_vwap(bars)
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}
