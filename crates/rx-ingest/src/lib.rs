//! Input loading for the reorder pipelines.
//!
//! This crate turns the upstream exports into Polars DataFrames and raw
//! record vectors. It performs no cleaning: blank and unparsable cells are
//! passed through for the pipelines to count and drop.
//!
//! # Features
//!
//! - **CSV Loading**: every column is read as text so that mixed numeric and
//!   text quantity cells never abort a load
//! - **Sections**: a directory of CSV files stands in for a multi-sheet
//!   workbook; the raw data section is picked by name pattern
//! - **Column Resolution**: exact header match first, whitespace-tolerant
//!   match second, [`ReorderError::SchemaMismatch`] otherwise
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rx_ingest::{read_batch_report, read_stock_report};
//!
//! let stock = read_stock_report(Path::new("Material_Global_Stock_Report.csv"))?;
//! let (section, batches) = read_batch_report(Path::new("stock_report/"), "raw")?;
//! ```
//!
//! [`ReorderError::SchemaMismatch`]: rx_model::ReorderError::SchemaMismatch

mod csv;
mod records;
mod schema;
mod sections;

// === CSV Reading ===
pub use csv::{ensure_exists, read_csv_frame};

// === Sections ===
pub use sections::{Section, list_sections, resolve_table_path, select_section};

// === Column Resolution ===
pub use schema::{cell_text, find_column_containing, require_columns, resolve_column};

// === Raw Records ===
pub use records::{
    batch_records_from_frame, pending_po_records_from_frame, read_batch_report, read_pending_po,
    read_stock_report, stock_records_from_frame,
};
