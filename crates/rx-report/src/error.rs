//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

/// Export operation error.
#[derive(Debug, Error)]
pub enum ExportError {
    /// File I/O error.
    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding error.
    #[error("failed to write CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Temp file couldn't be renamed over the target.
    #[error(
        "failed to move {} into place at {}: {source}",
        .temp_path.display(),
        .target_path.display()
    )]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading cells from the table failed.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for ExportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
