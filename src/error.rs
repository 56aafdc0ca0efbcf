//! Error handling for culture data loading, processing and rendering.
//!
//! Distinguishes configuration failures (fatal at startup), input failures
//! (fatal to a single workflow) and rendering failures. Data-quality issues
//! are never errors: they are coerced to null or skipped with a warning.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CultureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Could not decode {path} as {encoding}: {reason}")]
    Decode {
        path: PathBuf,
        encoding: String,
        reason: String,
    },

    #[error("Header with '{marker}' was not found in file: {path}")]
    HeaderNotFound { path: PathBuf, marker: String },

    #[error("Parse error in {path} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("CSV tokenizing failed for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing columns in {dataset} data: {columns:?}")]
    MissingColumns {
        dataset: String,
        columns: Vec<String>,
    },

    #[error("{dataset} data is not loaded")]
    DataNotLoaded { dataset: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Rendering failed for {path}: {reason}")]
    Rendering { path: PathBuf, reason: String },
}

impl CultureError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing-columns error for the named dataset
    pub fn missing_columns(dataset: impl Into<String>, columns: Vec<String>) -> Self {
        Self::MissingColumns {
            dataset: dataset.into(),
            columns,
        }
    }

    /// Whether the error originates from the input files rather than the data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CultureError::FileNotFound { .. }
                | CultureError::Decode { .. }
                | CultureError::HeaderNotFound { .. }
                | CultureError::Parse { .. }
                | CultureError::Csv { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CultureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names() {
        let err = CultureError::missing_columns("offline", vec!["BTM".to_string()]);
        assert_eq!(err.to_string(), r#"Missing columns in offline data: ["BTM"]"#);
    }

    #[test]
    fn test_input_error_classification() {
        let err = CultureError::FileNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert!(err.is_input_error());
        assert!(!CultureError::configuration("bad").is_input_error());
    }
}
