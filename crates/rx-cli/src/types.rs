//! Results of the CLI commands.

use std::path::PathBuf;

use rx_engine::{GlobalStockReport, InventoryReport, MainStoreReport};

/// Global stock lookup written to `output`.
#[derive(Debug)]
pub struct GlobalStockOutcome {
    pub report: GlobalStockReport,
    pub output: PathBuf,
}

/// Main store lookup written to `output`.
#[derive(Debug)]
pub struct MainStoreOutcome {
    pub report: MainStoreReport,
    pub output: PathBuf,
}

/// Inventory calculation written to `output`.
#[derive(Debug)]
pub struct CalculateOutcome {
    pub report: InventoryReport,
    pub output: PathBuf,
}

/// All three outputs of a composite run.
#[derive(Debug)]
pub struct RunOutcome {
    pub global: GlobalStockOutcome,
    pub main_store: MainStoreOutcome,
    pub inventory: CalculateOutcome,
}
