//! Post-condition checks for the aggregators and the inventory table.

use polars::prelude::*;
use rx_common::any_to_f64;
use rx_ingest::cell_text;
use rx_model::columns::derived;
use rx_model::{ReorderError, Result};

use crate::lookup::StockLookup;

/// Maximum number of offending rows quoted in a metric error.
const MAX_EXAMPLES: usize = 5;

/// Aggregated totals must be finite and non-negative.
///
/// Key uniqueness holds by construction of [`StockLookup`].
pub fn check_lookup_invariants(lookup: &StockLookup, context: &str) -> Result<()> {
    if let Some((code, _)) = lookup.iter().find(|(_, total)| !total.is_finite()) {
        return Err(ReorderError::invariant(
            context,
            format!("null quantity for item '{code}'"),
        ));
    }
    let negative: Vec<&str> = lookup
        .iter()
        .filter(|(_, total)| *total < 0.0)
        .map(|(code, _)| code)
        .collect();
    if !negative.is_empty() {
        return Err(ReorderError::invariant(
            context,
            format!(
                "negative quantities found for {} item(s): {}",
                negative.len(),
                negative
                    .iter()
                    .take(MAX_EXAMPLES)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }
    Ok(())
}

/// Output total must equal input total within `tolerance`, inclusive.
pub fn check_conservation(input_total: f64, output_total: f64, tolerance: f64) -> Result<()> {
    if (input_total - output_total).abs() <= tolerance {
        Ok(())
    } else {
        Err(ReorderError::ConservationViolation {
            input_total,
            output_total,
            tolerance,
        })
    }
}

/// Result of validating the computed inventory table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Structural divergences that do not fail the run.
    pub warnings: Vec<String>,
}

/// Re-derives the stored metrics of the inventory table.
///
/// Net stock must equal global stock plus pending PO exactly, and order
/// quantities must be non-negative, zero without a reorder, and whole packs
/// when the pack size is positive. A column count other than
/// `expected_columns` is only a warning.
pub fn validate_inventory(
    df: &DataFrame,
    item_column: &str,
    pack_column: &str,
    expected_columns: usize,
) -> Result<ValidationOutcome> {
    let mut outcome = ValidationOutcome::default();
    if df.width() != expected_columns {
        let names: Vec<String> = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        tracing::warn!(
            expected = expected_columns,
            actual = df.width(),
            columns = ?names,
            "unexpected column count"
        );
        outcome.warnings.push(format!(
            "expected {expected_columns} columns, got {}",
            df.width()
        ));
    }

    let items = df.column(item_column)?;
    let global = float_values(df, derived::GLOBAL_STOCK)?;
    let pending = float_values(df, derived::PENDING_PO)?;
    let net = float_values(df, derived::NET_STOCK)?;
    let order = float_values(df, derived::ORDER_QTY)?;
    let reorder = bool_values(df, derived::REORDER_NEEDED)?;
    let pack = df.column(pack_column)?;

    let mut net_failures = Vec::new();
    let mut negative_orders = Vec::new();
    let mut order_without_reorder = Vec::new();
    let mut partial_packs = Vec::new();
    for idx in 0..df.height() {
        let label = || cell_text(items, idx).unwrap_or_else(|| format!("row {}", idx + 1));
        if net[idx] != global[idx] + pending[idx] {
            net_failures.push(label());
        }
        if order[idx] < 0.0 {
            negative_orders.push(label());
        }
        if !reorder[idx] && order[idx] != 0.0 {
            order_without_reorder.push(label());
        }
        let pack_size = any_to_f64(pack.get(idx).unwrap_or(AnyValue::Null));
        if let Some(pack_size) = pack_size.filter(|size| *size > 0.0) {
            let packs = order[idx] / pack_size;
            if (packs - packs.round()).abs() > 1e-9 {
                partial_packs.push(label());
            }
        }
    }

    metric_check("net stock identity", net_failures)?;
    metric_check("non-negative order quantity", negative_orders)?;
    metric_check("zero order without reorder", order_without_reorder)?;
    metric_check("whole pack order quantity", partial_packs)?;
    Ok(outcome)
}

fn metric_check(check: &str, failures: Vec<String>) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    Err(ReorderError::MetricComputation {
        check: check.to_string(),
        rows: failures.len(),
        examples: failures.into_iter().take(MAX_EXAMPLES).collect(),
    })
}

/// Values of a derived float column. Nulls read as NaN and fail every check.
fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect();
    Ok(values)
}

fn bool_values(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let values = df
        .column(name)?
        .bool()?
        .into_iter()
        .map(|value| value.unwrap_or(false))
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_model::ErrorKind;

    fn inventory(net: Vec<f64>, order: Vec<f64>, reorder: Vec<bool>) -> DataFrame {
        let rows = net.len();
        let codes: Vec<String> = (0..rows).map(|i| format!("I{i}")).collect();
        DataFrame::new(vec![
            Series::new("Item\nCode".into(), codes).into(),
            Series::new("Pack size".into(), vec!["10"; rows]).into(),
            Series::new(derived::GLOBAL_STOCK.into(), vec![5.0; rows]).into(),
            Series::new(derived::PENDING_PO.into(), vec![1.0; rows]).into(),
            Series::new(derived::NET_STOCK.into(), net).into(),
            Series::new(derived::REORDER_NEEDED.into(), reorder).into(),
            Series::new(derived::ORDER_QTY.into(), order).into(),
        ])
        .unwrap()
    }

    #[test]
    fn consistent_table_passes_with_column_warning() {
        let df = inventory(vec![6.0, 6.0], vec![20.0, 0.0], vec![true, false]);
        let outcome = validate_inventory(&df, "Item\nCode", "Pack size", 22).unwrap();
        assert_eq!(outcome.warnings, vec!["expected 22 columns, got 7"]);
    }

    #[test]
    fn net_stock_drift_is_detected() {
        let df = inventory(vec![6.0, 7.0], vec![0.0, 0.0], vec![false, false]);
        let err = validate_inventory(&df, "Item\nCode", "Pack size", 7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MetricComputation);
        assert!(err.to_string().contains("I1"));
    }

    #[test]
    fn negative_order_is_detected() {
        let df = inventory(vec![6.0], vec![-10.0], vec![true]);
        let err = validate_inventory(&df, "Item\nCode", "Pack size", 7).unwrap_err();
        match err {
            ReorderError::MetricComputation { check, rows, .. } => {
                assert_eq!(check, "non-negative order quantity");
                assert_eq!(rows, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn failed_check(err: ReorderError) -> (String, usize, Vec<String>) {
        match err {
            ReorderError::MetricComputation {
                check,
                rows,
                examples,
            } => (check, rows, examples),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn order_without_reorder_is_detected() {
        let df = inventory(vec![6.0, 6.0], vec![0.0, 20.0], vec![false, false]);
        let err = validate_inventory(&df, "Item\nCode", "Pack size", 7).unwrap_err();
        let (check, rows, examples) = failed_check(err);
        assert_eq!(check, "zero order without reorder");
        assert_eq!(rows, 1);
        assert_eq!(examples, vec!["I1"]);
    }

    #[test]
    fn partial_pack_order_is_detected() {
        let df = inventory(vec![6.0], vec![25.0], vec![true]);
        let err = validate_inventory(&df, "Item\nCode", "Pack size", 7).unwrap_err();
        let (check, rows, examples) = failed_check(err);
        assert_eq!(check, "whole pack order quantity");
        assert_eq!(rows, 1);
        assert_eq!(examples, vec!["I0"]);
    }

    #[test]
    fn conservation_tolerance() {
        assert!(check_conservation(100.0, 100.005, 0.01).is_ok());
        assert!(check_conservation(1.0, 1.25, 0.25).is_ok());
        assert!(check_conservation(1.25, 1.0, 0.25).is_ok());
        let err = check_conservation(100.0, 99.0, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConservationViolation);
    }
}
