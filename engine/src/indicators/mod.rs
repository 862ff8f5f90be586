// Technical indicators module
pub mod sma;

pub use sma::Sma;

use serde_json::Value;

// Common trait for all indicators
pub trait IndicatorCalculator {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    // One output per input value; None where the indicator can't be calculated
    // (insufficient history or a missing close in the window)
    fn calculate(&self, closes: &[Option<f64>]) -> Vec<Option<f64>>;
}
