//! Momentum indicators.

use papertrade_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::compute_ema;

/// Relative Strength Index with Wilder smoothing.
///
/// Needs at least `n + 1` closes, otherwise every value is `None`. The first
/// value sits at index `n` and is seeded from the simple mean of the first
/// `n` deltas. A zero average loss reads as 100.
///
/// A non-finite delta yields `None` at its index. In the seed it counts as
/// zero movement; afterwards it is skipped and the averages carry forward.
pub fn compute_rsi(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if n == 0 || closes.len() <= n {
        return result;
    }

    let period_f64 = n as f64;
    let delta = |i: usize| closes[i] - closes[i - 1];

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=n {
        let change = delta(i);
        if !change.is_finite() {
            continue;
        }
        if change >= 0.0 {
            gain_sum += change;
        } else {
            loss_sum -= change;
        }
    }

    let mut avg_gain = gain_sum / period_f64;
    let mut avg_loss = loss_sum / period_f64;
    if delta(n).is_finite() {
        result[n] = rsi_value(avg_gain, avg_loss);
    }

    // Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period
    for i in (n + 1)..closes.len() {
        let change = delta(i);
        if !change.is_finite() {
            continue;
        }
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (period_f64 - 1.0) + gain) / period_f64;
        avg_loss = (avg_loss * (period_f64 - 1.0) + loss) / period_f64;
        result[i] = rsi_value(avg_gain, avg_loss);
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    rsi.is_finite().then_some(rsi)
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        compute_rsi(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn warmup(&self) -> usize {
        self.period
    }
}

/// MACD output series, each aligned with the input closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<Option<f64>>,
    /// Signal line (EMA of MACD)
    pub signal: Vec<Option<f64>>,
    /// Histogram (MACD - Signal)
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// MACD with the standard 12/26/9 periods.
pub fn compute_macd(closes: &[f64]) -> MacdSeries {
    Macd::default().calculate(closes)
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    pub fn fast_period(&self) -> usize {
        self.fast_period
    }

    pub fn slow_period(&self) -> usize {
        self.slow_period
    }

    pub fn signal_period(&self) -> usize {
        self.signal_period
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdSeries;

    fn calculate(&self, data: &[f64]) -> MacdSeries {
        let fast_ema = compute_ema(data, self.fast_period);
        let slow_ema = compute_ema(data, self.slow_period);

        let macd: Vec<Option<f64>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|pair| match pair {
                (Some(fast), Some(slow)) => Some(fast - slow).filter(|v| v.is_finite()),
                _ => None,
            })
            .collect();

        // Missing MACD values feed the signal recursion as zero.
        let seeded: Vec<f64> = macd.iter().map(|v| v.unwrap_or(0.0)).collect();
        let signal = compute_ema(&seeded, self.signal_period);

        let histogram = macd
            .iter()
            .zip(signal.iter())
            .map(|pair| match pair {
                (Some(m), Some(s)) => Some(m - s).filter(|v| v.is_finite()),
                _ => None,
            })
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }

    fn period(&self) -> usize {
        self.fast_period.max(self.slow_period)
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
