//! The reorder pipelines.
//!
//! Three pipelines compose in dependency order:
//!
//! 1. [`aggregate_global_stock`] - per-location stock rows to one total per
//!    item code
//! 2. [`aggregate_main_store`] - batch rows of the designated store to one
//!    total per item code, with quantity conservation enforced
//! 3. [`InventoryCalculator`] - master catalog plus both lookups and the
//!    pending PO feed to the reorder decision table
//!
//! Each run owns its working table; nothing is cached between runs.

pub mod calculator;
pub mod global_stock;
pub mod lookup;
pub mod main_store;
pub mod metrics;
pub mod pending_po;
pub mod progress;
pub mod summary;
pub mod validate;

pub use calculator::{CalculatorInputs, InventoryCalculator, InventoryReport};
pub use global_stock::{GlobalStockReport, aggregate_global_stock, global_stock_from_file};
pub use lookup::StockLookup;
pub use main_store::{MainStoreReport, aggregate_main_store, main_store_from_file};
pub use metrics::{InventoryMetrics, MetricInputs};
pub use pending_po::{PendingPoAggregate, aggregate_pending_po, parse_po_date};
pub use progress::{
    CancelFlag, NullProgress, Progress, ProgressError, ProgressSink, RecordingProgress,
};
pub use summary::InventorySummary;
pub use validate::ValidationOutcome;
