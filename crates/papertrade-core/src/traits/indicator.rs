//! Indicator trait definitions.

use crate::types::Bar;

/// Trait for single-output indicators over a close series.
///
/// Output is aligned index-for-index with the input. `None` marks warm-up
/// or a value that could not be computed from non-finite input.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given closes.
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Index of the first value that can be defined for clean input.
    fn warmup(&self) -> usize {
        self.period().saturating_sub(1)
    }
}

/// Multi-output indicator (e.g. MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple aligned series.
    type Outputs;

    /// Calculate indicator values for the given closes.
    fn calculate(&self, data: &[f64]) -> Self::Outputs;

    /// Get the longest lookback period involved.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator that needs whole bars rather than closes (e.g. VWAP).
pub trait BarIndicator: Send + Sync {
    /// Calculate indicator values from bars.
    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>>;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            let mut out = vec![None; data.len()];
            if self.period == 0 {
                return out;
            }
            // Simple windowed sum for testing
            for (i, window) in data.windows(self.period).enumerate() {
                out[i + self.period - 1] = Some(window.iter().sum());
            }
            out
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_calculate_is_aligned() {
        let indicator = TestIndicator { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[..2].iter().all(Option::is_none));
        assert_eq!(result[2], Some(6.0));
        assert_eq!(result[4], Some(12.0));
    }

    #[test]
    fn test_default_warmup() {
        assert_eq!(TestIndicator { period: 3 }.warmup(), 2);
        assert_eq!(TestIndicator { period: 0 }.warmup(), 0);
    }
}
