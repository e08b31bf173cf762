//! Closing summary of an inventory calculation.

use polars::prelude::*;
use rx_common::any_to_f64;
use rx_ingest::find_column_containing;
use rx_model::Result;
use rx_model::columns::{derived, master};

/// Headline figures of a finished inventory calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySummary {
    pub master_rows: usize,
    pub active_rows: usize,
    pub total_items: usize,
    pub items_with_global_stock: usize,
    pub items_with_main_store_stock: usize,
    pub items_with_pending_po: usize,
    pub po_lines_loaded: usize,
    pub po_lines_kept: usize,
    pub reorder_items: usize,
    pub total_order_qty: f64,
    /// Σ order qty × unit cost; zero when the catalog has no unit cost column.
    pub order_value: f64,
    pub unit_cost_column: Option<String>,
    pub mean_global_stock_days: f64,
    pub mean_main_store_stock_days: f64,
    pub warnings: Vec<String>,
}

impl InventorySummary {
    /// Fills the figures derived from the final table.
    ///
    /// Counts gathered during the run (master rows, PO lines, warnings) are
    /// left as they are.
    pub fn read_frame(&mut self, df: &DataFrame) -> Result<()> {
        let order = floats(df, derived::ORDER_QTY)?;
        self.total_items = df.height();
        self.items_with_global_stock = count_positive(&floats(df, derived::GLOBAL_STOCK)?);
        self.items_with_main_store_stock =
            count_positive(&floats(df, derived::MAIN_STORE_STOCK)?);
        self.items_with_pending_po = count_positive(&floats(df, derived::PENDING_PO)?);
        self.reorder_items = df
            .column(derived::REORDER_NEEDED)?
            .bool()?
            .into_iter()
            .filter(|flag| flag.unwrap_or(false))
            .count();
        self.total_order_qty = order.iter().sum();
        self.mean_global_stock_days = mean(&floats(df, derived::GLOBAL_STOCK_DAYS)?);
        self.mean_main_store_stock_days = mean(&floats(df, derived::MAIN_STORE_STOCK_DAYS)?);

        self.unit_cost_column = find_column_containing(df, master::UNIT_COST_FRAGMENT);
        self.order_value = match &self.unit_cost_column {
            Some(name) => {
                let cost = df.column(name)?;
                order
                    .iter()
                    .enumerate()
                    .map(|(idx, qty)| {
                        qty * any_to_f64(cost.get(idx).unwrap_or(AnyValue::Null)).unwrap_or(0.0)
                    })
                    .sum()
            }
            None => 0.0,
        };
        Ok(())
    }
}

fn floats(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();
    Ok(values)
}

fn count_positive(values: &[f64]) -> usize {
    values.iter().filter(|value| **value > 0.0).count()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_value_uses_unit_cost_column() {
        let df = DataFrame::new(vec![
            Series::new("Unit Cost (INR)".into(), vec!["2.5", "n/a"]).into(),
            Series::new(derived::GLOBAL_STOCK.into(), vec![10.0, 0.0]).into(),
            Series::new(derived::MAIN_STORE_STOCK.into(), vec![0.0, 3.0]).into(),
            Series::new(derived::PENDING_PO.into(), vec![0.0, 0.0]).into(),
            Series::new(derived::GLOBAL_STOCK_DAYS.into(), vec![4.0, 0.0]).into(),
            Series::new(derived::MAIN_STORE_STOCK_DAYS.into(), vec![1.0, 2.0]).into(),
            Series::new(derived::REORDER_NEEDED.into(), vec![true, true]).into(),
            Series::new(derived::ORDER_QTY.into(), vec![40.0, 10.0]).into(),
        ])
        .unwrap();

        let mut summary = InventorySummary::default();
        summary.read_frame(&df).unwrap();

        assert_eq!(summary.unit_cost_column.as_deref(), Some("Unit Cost (INR)"));
        assert_eq!(summary.order_value, 100.0);
        assert_eq!(summary.total_order_qty, 50.0);
        assert_eq!(summary.reorder_items, 2);
        assert_eq!(summary.items_with_global_stock, 1);
        assert_eq!(summary.items_with_main_store_stock, 1);
        assert_eq!(summary.mean_global_stock_days, 2.0);
        assert_eq!(summary.mean_main_store_stock_days, 1.5);
    }
}
