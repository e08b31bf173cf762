//! Conversion of loaded frames into raw record vectors.

use std::path::Path;

use polars::prelude::DataFrame;
use rx_model::columns::{batch_report, global_report, pending_po};
use rx_model::{PendingPoRecord, RawBatchRecord, RawStockRecord, Result};

use crate::csv::{ensure_exists, read_csv_frame};
use crate::schema::{cell_text, require_columns};
use crate::sections::{Section, resolve_table_path, select_section};

/// Extracts global stock report rows. Fails if a required column is absent.
pub fn stock_records_from_frame(df: &DataFrame) -> Result<Vec<RawStockRecord>> {
    let names = require_columns(df, &global_report::REQUIRED, "global stock report")?;
    let item = df.column(&names[0])?;
    let description = df.column(&names[1])?;
    let qty = df.column(&names[2])?;
    let records = (0..df.height())
        .map(|idx| RawStockRecord {
            item_code: cell_text(item, idx),
            description: cell_text(description, idx),
            quantity: cell_text(qty, idx),
        })
        .collect();
    Ok(records)
}

/// Extracts batch report rows. Fails if a required column is absent.
pub fn batch_records_from_frame(df: &DataFrame) -> Result<Vec<RawBatchRecord>> {
    let names = require_columns(df, &batch_report::REQUIRED, "batch stock report")?;
    let item = df.column(&names[0])?;
    let qty = df.column(&names[1])?;
    let store = df.column(&names[2])?;
    let records = (0..df.height())
        .map(|idx| RawBatchRecord {
            item_code: cell_text(item, idx),
            store_name: cell_text(store, idx),
            quantity: cell_text(qty, idx),
        })
        .collect();
    Ok(records)
}

/// Extracts pending PO lines. Fails if a required column is absent.
pub fn pending_po_records_from_frame(df: &DataFrame) -> Result<Vec<PendingPoRecord>> {
    let names = require_columns(df, &pending_po::REQUIRED, "pending PO feed")?;
    let item = df.column(&names[0])?;
    let store = df.column(&names[1])?;
    let created = df.column(&names[2])?;
    let pending = df.column(&names[3])?;
    let records = (0..df.height())
        .map(|idx| PendingPoRecord {
            item_code: cell_text(item, idx),
            store_name: cell_text(store, idx),
            created: cell_text(created, idx),
            pending_qty: cell_text(pending, idx),
        })
        .collect();
    Ok(records)
}

/// Loads the global stock report CSV.
pub fn read_stock_report(path: &Path) -> Result<Vec<RawStockRecord>> {
    let df = read_csv_frame(path)?;
    stock_records_from_frame(&df)
}

/// Loads the raw data section of the batch report workbook.
///
/// Returns the chosen section alongside its rows.
pub fn read_batch_report(path: &Path, pattern: &str) -> Result<(Section, Vec<RawBatchRecord>)> {
    ensure_exists(path)?;
    let section = select_section(path, pattern)?;
    let df = read_csv_frame(&section.path)?;
    let records = batch_records_from_frame(&df)?;
    Ok((section, records))
}

/// Loads the pending PO feed (a CSV file or the first section of a workbook
/// directory).
pub fn read_pending_po(path: &Path) -> Result<Vec<PendingPoRecord>> {
    ensure_exists(path)?;
    let table = resolve_table_path(path)?;
    let df = read_csv_frame(&table)?;
    pending_po_records_from_frame(&df)
}
