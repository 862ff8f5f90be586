// One render cycle: load (memoized), prepare, hand the series to the caller
use shared::models::PriceSeries;
use std::path::Path;

use super::series_preparer::SeriesPreparer;
use crate::config::settings::AnalyzerSettings;
use crate::data::table_cache::TableCache;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub symbol: String,
    pub series: PriceSeries,
}

pub struct TrendAnalyzer {
    symbol: String,
    preparer: SeriesPreparer,
    cache: TableCache,
}

impl TrendAnalyzer {
    pub fn new(settings: &AnalyzerSettings) -> Result<Self> {
        settings.validate()?;
        Ok(TrendAnalyzer {
            symbol: settings.symbol.clone(),
            preparer: SeriesPreparer::new(&settings.sma_windows, &settings.date_formats)?,
            cache: TableCache::new(settings.delimiter()?),
        })
    }

    pub fn analyze_path(&mut self, path: impl AsRef<Path>) -> Result<TrendReport> {
        let path = path.as_ref();
        tracing::info!(symbol = %self.symbol, path = %path.display(), "Fetching stock data");

        let table = self.cache.get_or_load_path(path).map_err(|e| {
            tracing::error!(path = %path.display(), error_detail = %e, "Failed to load CSV");
            e
        })?;
        self.build_report(&table)
    }

    /// Same as `analyze_path` for data that arrived as an in-memory upload.
    pub fn analyze_upload(&mut self, name: &str, bytes: &[u8]) -> Result<TrendReport> {
        tracing::info!(symbol = %self.symbol, upload = name, size = bytes.len(), "Analyzing uploaded CSV");

        let table = self.cache.get_or_load_bytes(name, bytes).map_err(|e| {
            tracing::error!(upload = name, error_detail = %e, "Failed to parse uploaded CSV");
            e
        })?;
        self.build_report(&table)
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    fn build_report(&self, table: &shared::models::CsvTable) -> Result<TrendReport> {
        let series = self.preparer.prepare(table).map_err(|e| {
            tracing::error!(symbol = %self.symbol, error_detail = %e, "Failed to prepare price series");
            e
        })?;

        tracing::info!(
            symbol = %self.symbol,
            rows = series.len(),
            indicators = series.indicators.len(),
            "Prepared stock data and moving averages"
        );
        Ok(TrendReport {
            symbol: self.symbol.clone(),
            series,
        })
    }
}
