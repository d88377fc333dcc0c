//! Moving average indicators.

use papertrade_core::traits::Indicator;

/// Simple moving average of `closes` over `n` periods.
///
/// Defined from index `n - 1` onward. A non-finite close yields `None` for
/// every window that contains it; windows after it recover.
pub fn compute_sma(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if n == 0 {
        return result;
    }

    let period_f64 = n as f64;
    let mut sum = 0.0;
    // Non-finite values currently inside the window
    let mut invalid = 0usize;

    for (i, &value) in closes.iter().enumerate() {
        if value.is_finite() {
            sum += value;
        } else {
            invalid += 1;
        }

        if i >= n {
            let dropped = closes[i - n];
            if dropped.is_finite() {
                sum -= dropped;
            } else {
                invalid -= 1;
            }
        }

        if !sum.is_finite() {
            // Overflowed; resync from the window itself.
            sum = closes[(i + 1).saturating_sub(n)..=i]
                .iter()
                .filter(|v| v.is_finite())
                .sum();
        }

        if i + 1 >= n && invalid == 0 {
            let mean = sum / period_f64;
            result[i] = mean.is_finite().then_some(mean);
        }
    }

    result
}

/// Exponential moving average of `closes` with `k = 2 / (n + 1)`.
///
/// Seeded with the first finite close, so there is no warm-up gap. A
/// non-finite close yields `None` at its index and the previous average
/// carries forward.
pub fn compute_ema(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if n == 0 {
        return result;
    }

    let multiplier = 2.0 / (n as f64 + 1.0);
    let one_minus_mult = 1.0 - multiplier;
    let mut ema: Option<f64> = None;

    for (i, &price) in closes.iter().enumerate() {
        if !price.is_finite() {
            continue;
        }
        let next = match ema {
            None => price,
            Some(prev) => price * multiplier + prev * one_minus_mult,
        };
        if next.is_finite() {
            ema = Some(next);
            result[i] = ema;
        }
    }

    result
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period. A zero period produces
    /// an all-`None` series.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        compute_sma(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Smoothing factor `2 / (period + 1)`.
    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        compute_ema(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn warmup(&self) -> usize {
        0
    }
}
