//! Command implementations.
//!
//! Every command computes its table completely before anything is written,
//! and writes through a temp file, so a failure never leaves an output
//! behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rx_engine::{
    CalculatorInputs, InventoryCalculator, Progress, ProgressSink, global_stock_from_file,
    main_store_from_file,
};
use rx_model::ReorderOptions;
use rx_report::{
    GLOBAL_STOCK_LOOKUP_FILE, INVENTORY_CALCULATION_FILE, MAIN_STORE_LOOKUP_FILE,
    write_csv_atomic,
};
use tracing::info_span;

use crate::types::{CalculateOutcome, GlobalStockOutcome, MainStoreOutcome, RunOutcome};

/// Builds the global stock lookup from `input` and writes it to `output`.
pub fn run_global_stock(
    input: &Path,
    output: Option<PathBuf>,
    options: &ReorderOptions,
    sink: &dyn ProgressSink,
) -> Result<GlobalStockOutcome> {
    let span = info_span!("global_stock_command", input = %input.display());
    let _guard = span.enter();
    let output = output.unwrap_or_else(|| PathBuf::from(GLOBAL_STOCK_LOOKUP_FILE));
    let progress = Progress::new(sink);

    let report = global_stock_from_file(input, options, progress)
        .with_context(|| format!("global stock aggregation of {}", input.display()))?;
    progress.report(format!("Exporting to {}", output.display()));
    write_csv_atomic(&report.lookup.to_frame()?, &output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(GlobalStockOutcome { report, output })
}

/// Builds the main store lookup from `input` and writes it to `output`.
pub fn run_main_store(
    input: &Path,
    output: Option<PathBuf>,
    options: &ReorderOptions,
    sink: &dyn ProgressSink,
) -> Result<MainStoreOutcome> {
    let span = info_span!("main_store_command", input = %input.display());
    let _guard = span.enter();
    let output = output.unwrap_or_else(|| PathBuf::from(MAIN_STORE_LOOKUP_FILE));
    let progress = Progress::new(sink);

    let report = main_store_from_file(input, options, progress)
        .with_context(|| format!("main store aggregation of {}", input.display()))?;
    progress.report(format!("Exporting to {}", output.display()));
    write_csv_atomic(&report.lookup.to_frame()?, &output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(MainStoreOutcome { report, output })
}

/// Runs the inventory calculation and writes the sorted sheet to `output`.
pub fn run_calculate(
    inputs: &CalculatorInputs,
    output: Option<PathBuf>,
    options: &ReorderOptions,
    now: NaiveDateTime,
    sink: &dyn ProgressSink,
) -> Result<CalculateOutcome> {
    let output = output.unwrap_or_else(|| PathBuf::from(INVENTORY_CALCULATION_FILE));
    let progress = Progress::new(sink);

    let report = InventoryCalculator::new(options.clone(), progress)
        .run(inputs, now)
        .context("inventory calculation")?;
    progress.report(format!("Exporting to {}", output.display()));
    write_csv_atomic(&report.frame, &output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(CalculateOutcome { report, output })
}

/// Raw inputs of a composite run.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub stock_report: PathBuf,
    pub batch_report: PathBuf,
    pub master: PathBuf,
    pub pending_po: PathBuf,
    pub output_dir: PathBuf,
}

/// Chains the three pipelines; the lookups written by the first two feed
/// the calculation.
pub fn run_all(
    inputs: &RunInputs,
    options: &ReorderOptions,
    now: NaiveDateTime,
    sink: &dyn ProgressSink,
) -> Result<RunOutcome> {
    std::fs::create_dir_all(&inputs.output_dir)
        .with_context(|| format!("create {}", inputs.output_dir.display()))?;

    let global = run_global_stock(
        &inputs.stock_report,
        Some(inputs.output_dir.join(GLOBAL_STOCK_LOOKUP_FILE)),
        options,
        sink,
    )?;
    let main_store = run_main_store(
        &inputs.batch_report,
        Some(inputs.output_dir.join(MAIN_STORE_LOOKUP_FILE)),
        options,
        sink,
    )?;
    let calculator_inputs = CalculatorInputs {
        master: inputs.master.clone(),
        global_stock: global.output.clone(),
        main_store: main_store.output.clone(),
        pending_po: inputs.pending_po.clone(),
    };
    let inventory = run_calculate(
        &calculator_inputs,
        Some(inputs.output_dir.join(INVENTORY_CALCULATION_FILE)),
        options,
        now,
        sink,
    )?;
    Ok(RunOutcome {
        global,
        main_store,
        inventory,
    })
}
