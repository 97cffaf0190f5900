//! Error types for vset-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vset-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Spreadsheet could not be opened or read
    #[error("failed to read workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// Spreadsheet has no worksheets
    #[error("workbook '{0}' contains no sheets")]
    EmptyWorkbook(PathBuf),

    /// Input file type we cannot read rows from
    #[error("unsupported input format '{path}' (expected .xlsx, .xls, .xlsb, .ods or .csv)")]
    UnsupportedFormat { path: PathBuf },

    /// The reference catalog was never loaded or holds no sets
    #[error("volume set catalog not ready: no sets loaded")]
    CatalogNotReady,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
