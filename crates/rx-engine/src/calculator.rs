//! Inventory calculation as a linear stage machine.
//!
//! # Stages
//!
//! 1. **LOAD** - keep active master rows
//! 2. **MERGE_GLOBAL** - join global stock, misses are 0
//! 3. **MERGE_MAIN_STORE** - join main store stock, misses are 0
//! 4. **MERGE_PENDING_PO** - join recent designated-store PO quantities
//! 5. **COMPUTE_METRICS** - net stock, stock days, reorder flag, order qty
//! 6. **VALIDATE** - re-derive the metrics
//! 7. **EXPORT** - sort most urgent first and hand over the table
//!
//! Every stage checks that its predecessor completed, so calling stages out
//! of order fails with [`ReorderError::StageOrder`] instead of computing on a
//! half-built table.
//!
//! # Example
//!
//! ```ignore
//! use rx_engine::{CalculatorInputs, InventoryCalculator, Progress};
//!
//! let calculator = InventoryCalculator::new(options, Progress::silent());
//! let report = calculator.run(&inputs, now)?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use polars::prelude::*;
use rx_common::{any_to_bool, any_to_f64};
use rx_ingest::{read_csv_frame, require_columns, resolve_table_path};
use rx_model::columns::{batch_report, derived, global_lookup, main_store_lookup, master};
use rx_model::{PendingPoRecord, ReorderError, ReorderOptions, Result, Stage, StageError};
use tracing::info_span;

use crate::lookup::StockLookup;
use crate::metrics::{InventoryMetrics, MetricInputs};
use crate::pending_po::{PendingPoAggregate, aggregate_pending_po};
use crate::progress::{CancelFlag, Progress};
use crate::summary::InventorySummary;
use crate::validate::validate_inventory;

/// Stock written for an item absent from a lookup.
const MISSING_TOTAL: f64 = 0.0;

/// Input files of a full calculation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorInputs {
    pub master: PathBuf,
    pub global_stock: PathBuf,
    pub main_store: PathBuf,
    pub pending_po: PathBuf,
}

/// Final decision table plus its summary.
#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub frame: DataFrame,
    pub summary: InventorySummary,
}

/// Resolved names of the master columns the calculation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MasterColumns {
    item: String,
    active: String,
    adc: String,
    min_stock: String,
    max_stock: String,
    pack_size: String,
}

/// Stage machine owning one run's working table.
pub struct InventoryCalculator<'a> {
    options: ReorderOptions,
    progress: Progress<'a>,
    cancel: CancelFlag,
    completed: Option<Stage>,
    data: DataFrame,
    columns: Option<MasterColumns>,
    summary: InventorySummary,
}

impl<'a> InventoryCalculator<'a> {
    pub fn new(options: ReorderOptions, progress: Progress<'a>) -> Self {
        Self {
            options,
            progress,
            cancel: CancelFlag::new(),
            completed: None,
            data: DataFrame::default(),
            columns: None,
            summary: InventorySummary::default(),
        }
    }

    /// Polls `cancel` before every stage.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Last stage that completed, if any.
    pub fn completed_stage(&self) -> Option<Stage> {
        self.completed
    }

    /// Working table in its current state.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn options(&self) -> &ReorderOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    /// LOAD: keeps the master rows whose active flag is set.
    pub fn load_master(&mut self, master_df: &DataFrame) -> Result<()> {
        let start = self.begin(Stage::Load)?;
        let total = master_df.height();
        if total == 0 {
            return Err(ReorderError::empty("master catalog"));
        }
        let names = require_columns(&master_df, &master::REQUIRED, "master catalog")?;
        let columns = MasterColumns {
            item: names[0].clone(),
            active: names[1].clone(),
            adc: names[2].clone(),
            min_stock: names[3].clone(),
            max_stock: names[4].clone(),
            pack_size: names[5].clone(),
        };

        let active = master_df.column(&columns.active)?;
        let mask: Vec<bool> = (0..total)
            .map(|idx| any_to_bool(active.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &mask);
        let filtered = master_df.filter(&mask)?;
        if filtered.height() == 0 {
            return Err(ReorderError::AllRowsFilteredOut {
                context: "master catalog (no active SKUs)".to_string(),
                input_rows: total,
            });
        }

        self.progress.report(format!(
            "{} active SKUs (of {total} total)",
            filtered.height()
        ));
        self.summary.master_rows = total;
        self.summary.active_rows = filtered.height();
        self.data = filtered;
        self.columns = Some(columns);
        self.complete(Stage::Load, start);
        Ok(())
    }

    /// MERGE_GLOBAL: adds `Global stock`.
    pub fn merge_global_stock(&mut self, lookup: &StockLookup) -> Result<()> {
        let start = self.begin(Stage::MergeGlobal)?;
        let positive = self.join(lookup, derived::GLOBAL_STOCK)?;
        self.progress.report(format!(
            "Global stock merged - {positive} items with stock"
        ));
        self.complete(Stage::MergeGlobal, start);
        Ok(())
    }

    /// MERGE_MAIN_STORE: adds `Main Store Stock`.
    pub fn merge_main_store_stock(&mut self, lookup: &StockLookup) -> Result<()> {
        let start = self.begin(Stage::MergeMainStore)?;
        let positive = self.join(lookup, derived::MAIN_STORE_STOCK)?;
        self.progress.report(format!(
            "Main store stock merged - {positive} items with stock"
        ));
        self.complete(Stage::MergeMainStore, start);
        Ok(())
    }

    /// MERGE_PENDING_PO: adds `Pending PO` from lines of the designated store
    /// created within the window ending at `now`.
    pub fn merge_pending_po(
        &mut self,
        records: &[PendingPoRecord],
        now: NaiveDateTime,
    ) -> Result<PendingPoAggregate> {
        let start = self.begin(Stage::MergePendingPo)?;
        let aggregate = aggregate_pending_po(records, &self.options, now, self.progress);
        let positive = self.join(&aggregate.lookup, derived::PENDING_PO)?;
        self.progress.report(format!(
            "Pending PO merged - {positive} items with pending orders"
        ));
        self.summary.po_lines_loaded = aggregate.lines_loaded;
        self.summary.po_lines_kept = aggregate.lines_kept();
        self.complete(Stage::MergePendingPo, start);
        Ok(aggregate)
    }

    /// COMPUTE_METRICS: appends the five derived columns.
    pub fn compute_metrics(&mut self) -> Result<()> {
        let start = self.begin(Stage::ComputeMetrics)?;
        self.progress.report("Calculating inventory metrics");
        let columns = self.master_columns()?;
        let df = &self.data;

        let active = df.column(&columns.active)?;
        let adc = df.column(&columns.adc)?;
        let min_stock = df.column(&columns.min_stock)?;
        let max_stock = df.column(&columns.max_stock)?;
        let pack_size = df.column(&columns.pack_size)?;
        let global = df.column(derived::GLOBAL_STOCK)?.f64()?;
        let main_store = df.column(derived::MAIN_STORE_STOCK)?.f64()?;
        let pending = df.column(derived::PENDING_PO)?.f64()?;

        let number = |column: &Column, idx: usize| {
            any_to_f64(column.get(idx).unwrap_or(AnyValue::Null))
        };
        let metrics: Vec<InventoryMetrics> = (0..df.height())
            .map(|idx| {
                MetricInputs {
                    active: any_to_bool(active.get(idx).unwrap_or(AnyValue::Null)),
                    adc: number(adc, idx),
                    min_stock: number(min_stock, idx),
                    max_stock: number(max_stock, idx),
                    pack_size: number(pack_size, idx),
                    global_stock: global.get(idx).unwrap_or(0.0),
                    main_store_stock: main_store.get(idx).unwrap_or(0.0),
                    pending_po: pending.get(idx).unwrap_or(0.0),
                }
                .compute()
            })
            .collect();

        let net: Vec<f64> = metrics.iter().map(|m| m.net_stock).collect();
        let global_days: Vec<f64> = metrics.iter().map(|m| m.global_stock_days).collect();
        let main_days: Vec<f64> = metrics.iter().map(|m| m.main_store_stock_days).collect();
        let reorder: Vec<bool> = metrics.iter().map(|m| m.reorder_needed).collect();
        let order: Vec<f64> = metrics.iter().map(|m| m.order_qty).collect();

        self.data.with_column(Series::new(derived::NET_STOCK.into(), net))?;
        self.data
            .with_column(Series::new(derived::GLOBAL_STOCK_DAYS.into(), global_days))?;
        self.data
            .with_column(Series::new(derived::MAIN_STORE_STOCK_DAYS.into(), main_days))?;
        self.data
            .with_column(Series::new(derived::REORDER_NEEDED.into(), reorder))?;
        self.data
            .with_column(Series::new(derived::ORDER_QTY.into(), order))?;
        self.complete(Stage::ComputeMetrics, start);
        Ok(())
    }

    /// VALIDATE: re-derives the metrics; a column count divergence is kept
    /// as a warning.
    pub fn validate(&mut self) -> Result<()> {
        let start = self.begin(Stage::Validate)?;
        self.progress.report("Validating");
        let columns = self.master_columns()?;
        let outcome = validate_inventory(
            &self.data,
            &columns.item,
            &columns.pack_size,
            self.options.expected_output_columns,
        )?;
        for warning in &outcome.warnings {
            self.progress.report(format!("WARNING: {warning}"));
        }
        self.summary.warnings.extend(outcome.warnings);
        self.progress.report("All validations passed");
        self.complete(Stage::Validate, start);
        Ok(())
    }

    /// EXPORT: sorts by `Reorder Needed?` then `Order Qty`, both descending,
    /// and returns the final table.
    pub fn export(mut self) -> Result<InventoryReport> {
        let start = self.begin(Stage::Export)?;
        sort_most_urgent_first(&mut self.data)?;
        self.summary.read_frame(&self.data)?;
        self.complete(Stage::Export, start);
        Ok(InventoryReport {
            frame: self.data,
            summary: self.summary,
        })
    }

    /// Runs every stage from files, tagging a failure with its stage.
    ///
    /// Each input file is read inside the stage that consumes it.
    pub fn run(
        mut self,
        inputs: &CalculatorInputs,
        now: NaiveDateTime,
    ) -> std::result::Result<InventoryReport, StageError> {
        let span = info_span!("inventory_calculation");
        let _guard = span.enter();
        let start = Instant::now();

        at(Stage::Load, || {
            self.progress.report("Loading Master Data");
            let df = read_table(&inputs.master)?;
            self.load_master(&df)
        })?;
        at(Stage::MergeGlobal, || {
            self.progress.report("Merging Global Stock");
            let lookup = read_lookup(
                &inputs.global_stock,
                &[global_lookup::ITEM_CODE],
                global_lookup::TOTAL,
                "global stock lookup",
            )?;
            self.merge_global_stock(&lookup)
        })?;
        at(Stage::MergeMainStore, || {
            self.progress.report("Merging Main Store Stock");
            let lookup = read_lookup(
                &inputs.main_store,
                &[main_store_lookup::ITEM_CODE, batch_report::ITEM_CODE],
                main_store_lookup::TOTAL,
                "main store lookup",
            )?;
            self.merge_main_store_stock(&lookup)
        })?;
        at(Stage::MergePendingPo, || {
            self.progress.report("Processing Pending PO");
            let records = rx_ingest::read_pending_po(&inputs.pending_po)?;
            self.merge_pending_po(&records, now).map(|_| ())
        })?;
        at(Stage::ComputeMetrics, || self.compute_metrics())?;
        at(Stage::Validate, || self.validate())?;
        let report = at(Stage::Export, || self.export())?;

        tracing::info!(
            items = report.summary.total_items,
            reorder_items = report.summary.reorder_items,
            duration_ms = start.elapsed().as_millis(),
            "inventory calculation complete"
        );
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Checks cancellation and the predecessor of `stage`.
    fn begin(&self, stage: Stage) -> Result<Instant> {
        self.cancel.check(stage)?;
        if self.completed != stage.predecessor() {
            return Err(ReorderError::StageOrder {
                attempted: stage,
                completed: self.completed,
            });
        }
        tracing::debug!(stage = %stage, "stage started");
        Ok(Instant::now())
    }

    fn complete(&mut self, stage: Stage, start: Instant) {
        self.completed = Some(stage);
        tracing::info!(
            stage = %stage,
            rows = self.data.height(),
            duration_ms = start.elapsed().as_millis(),
            "stage complete"
        );
    }

    fn master_columns(&self) -> Result<MasterColumns> {
        self.columns
            .clone()
            .ok_or_else(|| ReorderError::invariant("inventory calculator", "master not loaded"))
    }

    /// Left-joins `lookup` as `target` and returns how many rows are positive.
    fn join(&mut self, lookup: &StockLookup, target: &str) -> Result<usize> {
        let columns = self.master_columns()?;
        let matched = lookup.left_join(&mut self.data, &columns.item, target, MISSING_TOTAL)?;
        tracing::debug!(target, matched, lookup_rows = lookup.len(), "lookup joined");
        let positive = self
            .data
            .column(target)?
            .f64()?
            .into_iter()
            .filter(|value| value.is_some_and(|v| v > 0.0))
            .count();
        Ok(positive)
    }
}

/// Runs `step`, tagging its error with `stage`.
fn at<T>(
    stage: Stage,
    step: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, StageError> {
    step().map_err(|source| {
        tracing::error!(stage = %stage, error = %source, "stage failed");
        StageError { stage, source }
    })
}

fn read_table(path: &Path) -> Result<DataFrame> {
    rx_ingest::ensure_exists(path)?;
    read_csv_frame(&resolve_table_path(path)?)
}

fn read_lookup(
    path: &Path,
    key_candidates: &[&str],
    value_column: &str,
    context: &str,
) -> Result<StockLookup> {
    let df = read_table(path)?;
    StockLookup::from_frame(&df, key_candidates, value_column, context)
}

/// Stable sort: rows needing a reorder first, then larger orders first.
fn sort_most_urgent_first(df: &mut DataFrame) -> Result<()> {
    let reorder: Vec<bool> = df
        .column(derived::REORDER_NEEDED)?
        .bool()?
        .into_iter()
        .map(|value| value.unwrap_or(false))
        .collect();
    let order: Vec<f64> = df
        .column(derived::ORDER_QTY)?
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(0.0))
        .collect();
    let mut indices: Vec<u32> = (0..df.height()).map(|idx| idx as u32).collect();
    indices.sort_by(|a, b| {
        let (a, b) = (*a as usize, *b as usize);
        reorder[b].cmp(&reorder[a]).then_with(|| {
            order[b]
                .partial_cmp(&order[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    let idx = UInt32Chunked::from_vec("idx".into(), indices);
    *df = df.take(&idx)?;
    Ok(())
}
