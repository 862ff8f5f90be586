// Engine library root
// Loads daily price CSVs, computes trailing moving averages and renders the
// result as a table and a line chart.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod report;
pub mod services;

pub use error::{EngineError, ErrorKind, Result};
pub use services::{SeriesPreparer, TrendAnalyzer, TrendReport};
