// Analysis services: the series preparer and the per-file analysis flow
pub mod series_preparer;
pub mod trend_analyzer;

pub use series_preparer::SeriesPreparer;
pub use trend_analyzer::{TrendAnalyzer, TrendReport};
