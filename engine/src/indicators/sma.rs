// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use serde_json::Value;

/// Trailing simple moving average: value `i` is the mean of the `period`
/// closes ending at `i`, undefined until `period` values have been seen and
/// for any window holding a missing close.
pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("SMA period must be greater than 0".to_string()));
        }
        Ok(Self {
            name: format!("SMA_{}", period),
            period,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, closes: &[Option<f64>]) -> Vec<Option<f64>> {
        if closes.len() < self.period {
            return vec![None; closes.len()];
        }

        let mut results = vec![None; self.period - 1]; // No SMA for initial period
        // Each window is summed on its own so long series don't accumulate drift
        results.extend(
            closes
                .windows(self.period)
                .map(|window| {
                    window
                        .iter()
                        .copied()
                        .sum::<Option<f64>>()
                        .map(|sum| sum / self.period as f64)
                }),
        );
        results
    }
}
