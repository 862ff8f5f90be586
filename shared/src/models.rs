use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw tabular data as read from a CSV source: one header row plus string
/// fields. Rows keep input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One parsed input row. A missing Date or Close cell (blank or an NA
/// token) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: Option<NaiveDate>,
    pub close: Option<f64>,
}

/// A parsed record together with the untouched fields of its source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub record: PriceRecord,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    // None where the window has not filled yet or holds a missing close
    pub values: Vec<Option<f64>>,
}

/// Prepared series: input columns in input order, one row per input row,
/// and derived indicator columns aligned by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceSeries {
    pub columns: Vec<String>,
    pub rows: Vec<PriceRow>,
    pub indicators: Vec<Indicator>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<Option<NaiveDate>> {
        self.rows.iter().map(|row| row.record.date).collect()
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.record.close).collect()
    }

    pub fn indicator(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|indicator| indicator.name == name)
    }
}
