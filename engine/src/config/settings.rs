// Analyzer settings, loaded from the embedded default JSON or a user file
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::data::csv_parser::date_format::DEFAULT_DATE_FORMATS;
use crate::error::{EngineError, Result};

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyzerSettings {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_file_path")]
    pub file_path: String,
    #[serde(default = "default_sma_windows")]
    pub sma_windows: Vec<usize>,
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: String, // Should be a single byte, JSON string is easier
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
    #[serde(default)]
    pub table_max_rows: Option<usize>,
    #[serde(default)]
    pub chart: ChartStyle,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartStyle {
    pub output_path: String,
    pub width: u32,
    pub height: u32,
    pub close_color: String,
    pub sma_colors: Vec<String>,
    pub line_width: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            output_path: "stock_trend.svg".to_string(),
            width: 1200,
            height: 600,
            close_color: "blue".to_string(),
            sma_colors: vec!["red".to_string(), "green".to_string()],
            line_width: 2,
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_symbol() -> String {
    "AAPL".to_string()
}

fn default_file_path() -> String {
    "data/sample_stock_data.csv".to_string()
}

fn default_sma_windows() -> Vec<usize> {
    vec![20, 50]
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        AnalyzerSettings {
            version: default_version(),
            symbol: default_symbol(),
            file_path: default_file_path(),
            sma_windows: default_sma_windows(),
            csv_delimiter: default_delimiter(),
            date_formats: default_date_formats(),
            table_max_rows: None,
            chart: ChartStyle::default(),
        }
    }
}

impl AnalyzerSettings {
    /// Settings embedded at build time from `assets/config/default.json`.
    pub fn load_default() -> anyhow::Result<Self> {
        Self::from_json(DEFAULT_CONFIG).context("embedded default configuration is invalid")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file '{}'", path.display()))?;
        Self::from_json(&config_str)
            .with_context(|| format!("Invalid configuration file '{}'", path.display()))
    }

    pub fn from_json(config_str: &str) -> anyhow::Result<Self> {
        let settings: AnalyzerSettings = serde_json::from_str(config_str)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sma_windows.is_empty() {
            return Err(EngineError::ConfigError("at least one SMA window is required".to_string()));
        }
        if self.sma_windows.contains(&0) {
            return Err(EngineError::ConfigError("SMA window cannot be 0".to_string()));
        }
        self.delimiter()?;
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(EngineError::ConfigError("chart dimensions must be positive".to_string()));
        }
        Ok(())
    }

    pub fn delimiter(&self) -> Result<u8> {
        match self.csv_delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(EngineError::ConfigError(format!(
                "CSV delimiter must be a single byte, got '{}'",
                self.csv_delimiter
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default() {
        let settings = AnalyzerSettings::load_default().unwrap();
        assert_eq!(settings.symbol, "AAPL");
        assert_eq!(settings.file_path, "data/sample_stock_data.csv");
        assert_eq!(settings.sma_windows, vec![20, 50]);
        assert_eq!(settings.delimiter().unwrap(), b',');
        assert_eq!(settings.chart.sma_colors, vec!["red", "green"]);
        assert_eq!(settings.table_max_rows, None);
    }

    #[test]
    fn test_embedded_default_matches_code_default() {
        assert_eq!(AnalyzerSettings::load_default().unwrap(), AnalyzerSettings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = AnalyzerSettings::from_json(r#"{ "symbol": "MSFT", "csv_delimiter": ";" }"#).unwrap();
        assert_eq!(settings.symbol, "MSFT");
        assert_eq!(settings.delimiter().unwrap(), b';');
        assert_eq!(settings.sma_windows, vec![20, 50]);
        assert_eq!(settings.chart, ChartStyle::default());
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = AnalyzerSettings::from_json(r#"{ "sma_windows": [0, 50] }"#).unwrap_err();
        assert!(err.to_string().contains("SMA window cannot be 0"));
    }

    #[test]
    fn test_multi_byte_delimiter_rejected() {
        assert!(AnalyzerSettings::from_json(r#"{ "csv_delimiter": ";;" }"#).is_err());
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = AnalyzerSettings::load_from_path("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }
}
