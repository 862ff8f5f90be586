// Turns a raw CSV table into a dated close series with trailing SMA columns
use shared::models::{CsvTable, Indicator, PriceRecord, PriceRow, PriceSeries};

use crate::data::csv_parser::date_format::{self, DEFAULT_DATE_FORMATS};
use crate::data::csv_parser::is_missing;
use crate::error::{EngineError, Result};
use crate::indicators::{IndicatorCalculator, Sma};

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";
pub const DEFAULT_WINDOWS: [usize; 2] = [20, 50];

pub struct SeriesPreparer {
    windows: Vec<Sma>,
    date_formats: Vec<String>,
}

impl SeriesPreparer {
    /// Preparer with one SMA per window. A zero window is rejected.
    pub fn new(windows: &[usize], date_formats: &[String]) -> Result<Self> {
        let windows = windows.iter().map(|&w| Sma::new(w)).collect::<Result<Vec<_>>>()?;
        Ok(Self {
            windows,
            date_formats: date_formats.to_vec(),
        })
    }

    pub fn windows(&self) -> Vec<usize> {
        self.windows.iter().map(Sma::period).collect()
    }

    /// Validates the required columns, parses every row and appends one
    /// `SMA_<w>` indicator per window. Missing cells are kept as gaps; any
    /// other failure aborts the whole table.
    pub fn prepare(&self, table: &CsvTable) -> Result<PriceSeries> {
        let close_idx = table
            .column_index(CLOSE_COLUMN)
            .ok_or_else(|| EngineError::MissingColumn(CLOSE_COLUMN.to_string()))?;
        let date_idx = table
            .column_index(DATE_COLUMN)
            .ok_or_else(|| EngineError::MissingColumn(DATE_COLUMN.to_string()))?;

        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, fields)| self.parse_row(idx + 1, fields, date_idx, close_idx))
            .collect::<Result<Vec<_>>>()?;

        let closes: Vec<Option<f64>> = rows.iter().map(|row| row.record.close).collect();
        let indicators = self
            .windows
            .iter()
            .map(|sma| Indicator {
                name: sma.name().to_string(),
                parameters: sma.parameters(),
                values: sma.calculate(&closes),
            })
            .collect();

        tracing::debug!(rows = rows.len(), windows = ?self.windows(), "Prepared price series");
        Ok(PriceSeries {
            columns: table.headers.clone(),
            rows,
            indicators,
        })
    }

    // `row` is 1-based, counting data rows after the header. Blank and NA
    // cells become `None`; anything else that fails to parse is an error.
    fn parse_row(&self, row: usize, fields: &[String], date_idx: usize, close_idx: usize) -> Result<PriceRow> {
        let date_str = fields.get(date_idx).map(String::as_str).unwrap_or("");
        let date = if is_missing(date_str) {
            None
        } else {
            let parsed = if self.date_formats.is_empty() {
                date_format::parse_date(date_str, DEFAULT_DATE_FORMATS)
            } else {
                date_format::parse_date(date_str, self.date_formats.as_slice())
            };
            let date = parsed.ok_or_else(|| EngineError::DateParse {
                row,
                value: date_str.to_string(),
            })?;
            Some(date)
        };

        let close_str = fields.get(close_idx).map(String::as_str).unwrap_or("");
        let close = if is_missing(close_str) {
            None
        } else {
            let close = close_str
                .trim()
                .parse::<f64>()
                .map_err(|_| EngineError::InvalidClose {
                    row,
                    value: close_str.to_string(),
                })?;
            // "NAN" and friends parse as floats but mean missing
            Some(close).filter(|c| !c.is_nan())
        };

        Ok(PriceRow {
            record: PriceRecord { date, close },
            fields: fields.to_vec(),
        })
    }
}

impl Default for SeriesPreparer {
    fn default() -> Self {
        SeriesPreparer {
            windows: DEFAULT_WINDOWS.iter().filter_map(|&period| Sma::new(period).ok()).collect(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}
