use std::path::PathBuf;
use thiserror::Error;

/// Coarse error categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    MissingColumn,
    DateParse,
    Unexpected,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("File not found: {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV file must contain a '{0}' column.")]
    MissingColumn(String),

    #[error("Failed to parse date '{value}' at row {row}")]
    DateParse { row: usize, value: String },

    #[error("Non-numeric Close value '{value}' at row {row}")]
    InvalidClose { row: usize, value: String },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::FileNotFound { .. } => ErrorKind::FileNotFound,
            EngineError::MissingColumn(_) => ErrorKind::MissingColumn,
            EngineError::DateParse { .. } => ErrorKind::DateParse,
            EngineError::InvalidClose { .. }
            | EngineError::CsvDataFormatError(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::IoError { .. }
            | EngineError::ConfigError(_)
            | EngineError::IndicatorError(_) => ErrorKind::Unexpected,
        }
    }

    /// The single line shown to the user when an analysis aborts.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::FileNotFound => "File not found. Please check the file path.".to_string(),
            ErrorKind::MissingColumn => format!("Error: {}", self),
            ErrorKind::DateParse => match self {
                EngineError::DateParse { row, value } => {
                    format!("Error: could not parse date '{}' at row {}.", value, row)
                }
                other => format!("Error: {}", other),
            },
            ErrorKind::Unexpected => format!("An unexpected error occurred: {}", self),
        }
    }
}
