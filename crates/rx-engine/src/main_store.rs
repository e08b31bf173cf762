//! Main store aggregation.
//!
//! Reduces the batch-level stock report to one total per item code for the
//! designated store, and enforces that grouping neither loses nor duplicates
//! quantity.

use std::path::Path;
use std::time::Instant;

use rx_common::parse_f64;
use rx_model::columns::main_store_lookup;
use rx_model::{RawBatchRecord, ReorderError, ReorderOptions, Result};
use tracing::info_span;

use crate::lookup::StockLookup;
use crate::progress::Progress;
use crate::validate::{check_conservation, check_lookup_invariants};

/// Outcome of a main store aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct MainStoreReport {
    pub lookup: StockLookup,
    pub input_rows: usize,
    pub other_store: usize,
    pub missing_item_code: usize,
    pub missing_quantity: usize,
    pub non_numeric_quantity: usize,
    /// Sum of the cleaned input quantities.
    pub input_total: f64,
    /// Workbook section the rows were read from, when loaded from a file.
    pub section: Option<String>,
}

impl MainStoreReport {
    pub fn kept_rows(&self) -> usize {
        self.input_rows
            - self.other_store
            - self.missing_item_code
            - self.missing_quantity
            - self.non_numeric_quantity
    }

    pub fn unique_items(&self) -> usize {
        self.lookup.len()
    }

    pub fn total_quantity(&self) -> f64 {
        self.lookup.total()
    }
}

/// Aggregates batch rows of `options.designated_store` into the main store
/// lookup.
///
/// Rows from other stores are dropped with a warning, not an error.
pub fn aggregate_main_store(
    records: &[RawBatchRecord],
    options: &ReorderOptions,
    progress: Progress<'_>,
) -> Result<MainStoreReport> {
    let span = info_span!("main_store", input_rows = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    if records.is_empty() {
        return Err(ReorderError::empty("batch stock report"));
    }
    let input_rows = records.len();
    let store = options.designated_store.as_str();

    let in_store: Vec<&RawBatchRecord> = records
        .iter()
        .filter(|record| record.store_name.as_deref().map(str::trim) == Some(store))
        .collect();
    let other_store = input_rows - in_store.len();
    progress.report(format!("{store} rows: {} / {input_rows}", in_store.len()));
    if other_store > 0 {
        tracing::warn!(other_store, store, "rows from other stores filtered out");
        progress.report(format!(
            "WARNING: {other_store} rows from other stores - filtering"
        ));
    }

    let missing_item_code = in_store
        .iter()
        .filter(|record| record.item_code.is_none())
        .count();
    let missing_quantity = in_store
        .iter()
        .filter(|record| record.item_code.is_some() && record.quantity.is_none())
        .count();
    progress.report(format!("Missing Item Codes : {missing_item_code}"));
    progress.report(format!("Missing Quantities : {missing_quantity}"));

    let mut non_numeric_quantity = 0usize;
    let mut pairs = Vec::with_capacity(in_store.len());
    for record in &in_store {
        let (Some(code), Some(raw_qty)) = (&record.item_code, &record.quantity) else {
            continue;
        };
        match parse_f64(raw_qty) {
            Some(quantity) => pairs.push((code.clone(), quantity)),
            None => non_numeric_quantity += 1,
        }
    }
    if non_numeric_quantity > 0 {
        progress.report(format!(
            "Removed {non_numeric_quantity} rows with non-numeric Qty."
        ));
    }

    if pairs.is_empty() {
        return Err(ReorderError::AllRowsFilteredOut {
            context: "batch stock report".to_string(),
            input_rows,
        });
    }

    let kept = pairs.len();
    let input_total: f64 = pairs.iter().map(|(_, quantity)| quantity).sum();
    let lookup = StockLookup::from_pairs(
        main_store_lookup::ITEM_CODE,
        main_store_lookup::TOTAL,
        pairs,
    );
    progress.report(format!(
        "{kept} batch records -> {} unique items",
        lookup.len()
    ));

    check_lookup_invariants(&lookup, "main store lookup")?;
    check_conservation(input_total, lookup.total(), options.conservation_tolerance)?;
    progress.report(format!("Quantity conservation: {:.2}", lookup.total()));

    tracing::info!(
        unique_items = lookup.len(),
        total_quantity = lookup.total(),
        duration_ms = start.elapsed().as_millis(),
        "main store aggregated"
    );

    Ok(MainStoreReport {
        lookup,
        input_rows,
        other_store,
        missing_item_code,
        missing_quantity,
        non_numeric_quantity,
        input_total,
        section: None,
    })
}

/// Loads the raw data section of the batch report at `path` and aggregates
/// it.
pub fn main_store_from_file(
    path: &Path,
    options: &ReorderOptions,
    progress: Progress<'_>,
) -> Result<MainStoreReport> {
    progress.report(format!("Loading {}", path.display()));
    let (section, records) = rx_ingest::read_batch_report(path, &options.raw_section_pattern)?;
    progress.report(format!(
        "Loaded {} rows from '{}'",
        records.len(),
        section.name
    ));
    let mut report = aggregate_main_store(&records, options, progress)?;
    report.section = Some(section.name);
    Ok(report)
}
