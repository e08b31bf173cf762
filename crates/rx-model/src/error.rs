//! Error taxonomy shared by every pipeline.
//!
//! Row-level defects never surface here: blank or unparsable rows are
//! dropped by the cleaning filters and only counted. Everything in
//! [`ReorderError`] is terminal for the run in which it occurs.

use std::path::PathBuf;

use thiserror::Error;

use crate::stage::Stage;

/// Classified pipeline failure.
#[derive(Debug, Error)]
pub enum ReorderError {
    // === File System Errors ===
    /// Input file (or section directory) does not exist.
    #[error("input file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {}: {message}", .path.display())]
    CsvParse { path: PathBuf, message: String },

    // === Schema Errors ===
    /// Required columns are absent (after whitespace-tolerant matching).
    #[error("{context} is missing required columns {missing:?} (available: {available:?})")]
    SchemaMismatch {
        context: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// No section of a workbook directory matches the expected name pattern.
    #[error("no section matching '{pattern}' in {} (available: {available:?})", .path.display())]
    MissingSection {
        path: PathBuf,
        pattern: String,
        available: Vec<String>,
    },

    // === Dataset Errors ===
    /// Input contains no data rows.
    #[error("{context} is empty")]
    EmptyDataset { context: String },

    /// Cleaning filters removed every row.
    #[error("all {input_rows} rows of {context} were filtered out; check input data")]
    AllRowsFilteredOut { context: String, input_rows: usize },

    /// Aggregation changed the total quantity.
    #[error(
        "quantity conservation violated: input total {input_total}, output total {output_total} \
         (tolerance {tolerance})"
    )]
    ConservationViolation {
        input_total: f64,
        output_total: f64,
        tolerance: f64,
    },

    /// A derived metric failed re-verification.
    #[error("metric check '{check}' failed for {rows} row(s){}", format_examples(.examples))]
    MetricComputation {
        check: String,
        rows: usize,
        examples: Vec<String>,
    },

    /// An aggregator post-condition does not hold.
    #[error("{context}: {message}")]
    InvariantViolation { context: String, message: String },

    // === Control Flow ===
    /// A calculator stage was invoked before its predecessor completed.
    #[error(
        "stage {attempted} cannot run after {}",
        .completed.map_or_else(|| "no completed stage".to_string(), |stage| stage.to_string())
    )]
    StageOrder {
        attempted: Stage,
        completed: Option<Stage>,
    },

    /// The caller's cancel flag was observed at a stage boundary.
    #[error("run cancelled before stage {stage}")]
    Cancelled { stage: Stage },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

/// Coarse classification of [`ReorderError`] for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    Read,
    SchemaMismatch,
    EmptyDataset,
    AllRowsFilteredOut,
    ConservationViolation,
    MetricComputation,
    InvariantViolation,
    StageOrder,
    Cancelled,
}

impl ReorderError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFile { .. } => ErrorKind::MissingFile,
            Self::FileRead { .. } | Self::CsvParse { .. } | Self::DataFrame { .. } => {
                ErrorKind::Read
            }
            Self::SchemaMismatch { .. } | Self::MissingSection { .. } => ErrorKind::SchemaMismatch,
            Self::EmptyDataset { .. } => ErrorKind::EmptyDataset,
            Self::AllRowsFilteredOut { .. } => ErrorKind::AllRowsFilteredOut,
            Self::ConservationViolation { .. } => ErrorKind::ConservationViolation,
            Self::MetricComputation { .. } => ErrorKind::MetricComputation,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::StageOrder { .. } => ErrorKind::StageOrder,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    pub fn empty(context: impl Into<String>) -> Self {
        Self::EmptyDataset {
            context: context.into(),
        }
    }

    pub fn invariant(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for ReorderError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// A calculator failure tagged with the stage that raised it.
#[derive(Debug, Error)]
#[error("stage {stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: ReorderError,
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

fn format_examples(examples: &[String]) -> String {
    if examples.is_empty() {
        String::new()
    } else {
        format!(" (e.g. {})", examples.join(", "))
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ReorderError>;
