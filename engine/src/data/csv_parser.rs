use csv::ReaderBuilder;
use shared::models::CsvTable;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{EngineError, Result};

// Lenient date handling for the "Date" column.
pub mod date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%Y%m%d"];

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    /// Parses a date-like string into a calendar date. Date formats are tried
    /// in order, then common datetime layouts and RFC 3339, keeping only the
    /// date part. Returns `None` for empty or unrecognised input.
    pub fn parse_date<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt.as_ref()).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        }

        #[test]
        fn test_parse_iso_date() {
            assert_eq!(parse_date("2024-01-02", DEFAULT_DATE_FORMATS), Some(ymd(2024, 1, 2)));
        }

        #[test]
        fn test_parse_us_date_is_month_first() {
            assert_eq!(parse_date("03/04/2024", DEFAULT_DATE_FORMATS), Some(ymd(2024, 3, 4)));
        }

        #[test]
        fn test_parse_compact_and_slashed() {
            assert_eq!(parse_date("20240105", DEFAULT_DATE_FORMATS), Some(ymd(2024, 1, 5)));
            assert_eq!(parse_date("2024/12/30", DEFAULT_DATE_FORMATS), Some(ymd(2024, 12, 30)));
        }

        #[test]
        fn test_parse_datetime_keeps_date() {
            assert_eq!(parse_date("2024-01-02 16:00:00", DEFAULT_DATE_FORMATS), Some(ymd(2024, 1, 2)));
            assert_eq!(parse_date("2024-01-02T09:30:00", DEFAULT_DATE_FORMATS), Some(ymd(2024, 1, 2)));
            assert_eq!(
                parse_date("2024-01-02T09:30:00-05:00", DEFAULT_DATE_FORMATS),
                Some(ymd(2024, 1, 2))
            );
        }

        #[test]
        fn test_parse_trims_whitespace() {
            assert_eq!(parse_date("  2024-01-02 ", DEFAULT_DATE_FORMATS), Some(ymd(2024, 1, 2)));
        }

        #[test]
        fn test_parse_invalid() {
            assert_eq!(parse_date("", DEFAULT_DATE_FORMATS), None);
            assert_eq!(parse_date("yesterday", DEFAULT_DATE_FORMATS), None);
            assert_eq!(parse_date("2024-13-40", DEFAULT_DATE_FORMATS), None);
        }

        #[test]
        fn test_custom_formats_take_precedence() {
            // Day-first layout only wins when configured
            let formats = ["%d/%m/%Y"];
            assert_eq!(parse_date("03/04/2024", &formats), Some(ymd(2024, 4, 3)));
        }
    }
}

/// Cell values read as missing rather than as data (pandas' default NA set).
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value.trim())
}

pub struct CsvTableReader;

impl CsvTableReader {
    /// Reads a whole CSV file into a `CsvTable`. A file that cannot be opened
    /// maps to `EngineError::FileNotFound`.
    pub fn read_path(file_path: impl AsRef<Path>, delimiter: u8) -> Result<CsvTable> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|source| EngineError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Reading CSV file");
        Self::read_reader(BufReader::new(file), delimiter)
    }

    /// Reads CSV data from any reader, e.g. an uploaded buffer.
    pub fn read_reader<R: Read>(reader: R, delimiter: u8) -> Result<CsvTable> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            if record.len() > width {
                return Err(EngineError::CsvDataFormatError(format!(
                    "row {} has {} fields, header has {}",
                    idx + 1,
                    record.len(),
                    width
                )));
            }
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            // Ragged rows are padded so every row lines up with the header
            if fields.len() < width {
                fields.resize(width, String::new());
            }
            rows.push(fields);
        }

        tracing::debug!(columns = width, rows = rows.len(), "Parsed CSV table");
        Ok(CsvTable::new(headers, rows))
    }
}
