//! Global stock aggregation.
//!
//! Reduces the per-location stock report to one total per item code.
//! Invalid rows are discarded, not corrected, so the output total is not
//! required to match the input total.

use std::path::Path;
use std::time::Instant;

use rx_common::parse_f64;
use rx_model::columns::global_lookup;
use rx_model::{RawStockRecord, ReorderError, ReorderOptions, Result};
use tracing::info_span;

use crate::lookup::StockLookup;
use crate::progress::Progress;
use crate::validate::check_lookup_invariants;

/// Outcome of a global stock aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStockReport {
    pub lookup: StockLookup,
    pub input_rows: usize,
    pub blank_description: usize,
    pub blank_quantity: usize,
    pub non_numeric_quantity: usize,
    pub missing_item_code: usize,
}

impl GlobalStockReport {
    /// Rows that survived every filter.
    pub fn kept_rows(&self) -> usize {
        self.input_rows
            - self.blank_description
            - self.blank_quantity
            - self.non_numeric_quantity
            - self.missing_item_code
    }

    pub fn unique_items(&self) -> usize {
        self.lookup.len()
    }

    pub fn total_quantity(&self) -> f64 {
        self.lookup.total()
    }
}

/// Aggregates raw stock rows into the global stock lookup.
///
/// Filters run in order: blank description, missing quantity, non-numeric
/// quantity, missing item code. Each filter reports how many rows it removed.
pub fn aggregate_global_stock(
    records: &[RawStockRecord],
    options: &ReorderOptions,
    progress: Progress<'_>,
) -> Result<GlobalStockReport> {
    let span = info_span!("global_stock", input_rows = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    if records.is_empty() {
        return Err(ReorderError::empty("global stock report"));
    }
    let input_rows = records.len();
    progress.report(format!("Loaded {input_rows} rows"));

    let described: Vec<&RawStockRecord> = records
        .iter()
        .filter(|record| record.description.is_some())
        .collect();
    let blank_description = input_rows - described.len();
    progress.report(format!("Removed {blank_description} rows with blank Description"));

    let with_qty: Vec<&RawStockRecord> = described
        .into_iter()
        .filter(|record| record.quantity.is_some())
        .collect();
    let blank_quantity = input_rows - blank_description - with_qty.len();
    progress.report(format!("Removed {blank_quantity} rows with blank Qty"));

    let parsed: Vec<(&RawStockRecord, f64)> = with_qty
        .iter()
        .filter_map(|record| {
            let quantity = record.quantity.as_deref().and_then(parse_f64)?;
            Some((*record, quantity))
        })
        .collect();
    let non_numeric_quantity = with_qty.len() - parsed.len();
    if non_numeric_quantity > 0 {
        progress.report(format!(
            "Removed {non_numeric_quantity} rows with non-numeric Qty"
        ));
    }

    let pairs: Vec<(String, f64)> = parsed
        .iter()
        .filter_map(|(record, quantity)| Some((record.item_code.clone()?, *quantity)))
        .collect();
    let missing_item_code = parsed.len() - pairs.len();
    if missing_item_code > 0 {
        progress.report(format!("Removed {missing_item_code} rows with blank ItemCode"));
    }

    if pairs.is_empty() {
        return Err(ReorderError::AllRowsFilteredOut {
            context: "global stock report".to_string(),
            input_rows,
        });
    }

    let kept = pairs.len();
    let lookup = StockLookup::from_pairs(global_lookup::ITEM_CODE, global_lookup::TOTAL, pairs);
    progress.report(format!("{kept} rows -> {} unique items", lookup.len()));

    check_lookup_invariants(&lookup, "global stock lookup")?;
    if lookup.get(&options.in_transit_code).is_some() {
        return Err(ReorderError::invariant(
            "global stock lookup",
            format!("placeholder code '{}' must not appear", options.in_transit_code),
        ));
    }

    tracing::info!(
        unique_items = lookup.len(),
        total_quantity = lookup.total(),
        duration_ms = start.elapsed().as_millis(),
        "global stock aggregated"
    );

    Ok(GlobalStockReport {
        lookup,
        input_rows,
        blank_description,
        blank_quantity,
        non_numeric_quantity,
        missing_item_code,
    })
}

/// Loads the global stock report CSV at `path` and aggregates it.
pub fn global_stock_from_file(
    path: &Path,
    options: &ReorderOptions,
    progress: Progress<'_>,
) -> Result<GlobalStockReport> {
    progress.report(format!("Loading {}", path.display()));
    let records = rx_ingest::read_stock_report(path)?;
    aggregate_global_stock(&records, options, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_model::ErrorKind;

    fn aggregate(records: &[RawStockRecord]) -> Result<GlobalStockReport> {
        aggregate_global_stock(records, &ReorderOptions::default(), Progress::silent())
    }

    #[test]
    fn blank_description_rows_are_dropped() {
        let records = vec![
            RawStockRecord::new("A1", "Widget", "10"),
            RawStockRecord::new("A1", "Widget", "5"),
            RawStockRecord::new("A2", "", "3"),
        ];
        let report = aggregate(&records).unwrap();
        let rows: Vec<(&str, f64)> = report.lookup.iter().collect();
        assert_eq!(rows, vec![("A1", 15.0)]);
        assert_eq!(report.blank_description, 1);
        assert_eq!(report.kept_rows(), 2);
    }

    #[test]
    fn counts_each_filter_separately() {
        let records = vec![
            RawStockRecord::new("A1", "Widget", ""),
            RawStockRecord::new("A1", "Widget", "n/a"),
            RawStockRecord::new("", "Orphan", "4"),
            RawStockRecord::new("B1", "Gauze", "2.5"),
        ];
        let report = aggregate(&records).unwrap();
        assert_eq!(report.blank_quantity, 1);
        assert_eq!(report.non_numeric_quantity, 1);
        assert_eq!(report.missing_item_code, 1);
        assert_eq!(report.total_quantity(), 2.5);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = aggregate(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDataset);
    }

    #[test]
    fn every_row_filtered_is_an_error() {
        let records = vec![RawStockRecord::new("A1", "", "1")];
        let err = aggregate(&records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllRowsFilteredOut);
    }

    #[test]
    fn placeholder_code_fails_post_condition() {
        let records = vec![RawStockRecord::new("Intransit Store", "Transit", "7")];
        let err = aggregate(&records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[test]
    fn negative_total_fails_post_condition() {
        let records = vec![RawStockRecord::new("A1", "Widget", "-3")];
        let err = aggregate(&records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }
}
