//! Configuration options for the reorder pipelines.

use serde::{Deserialize, Serialize};

/// Store whose stock and purchase orders feed the reorder decision.
pub const DEFAULT_DESIGNATED_STORE: &str = "Main Medical Store (MMS)-SEPL";

/// Placeholder code the global report uses for goods in transit.
pub const DEFAULT_IN_TRANSIT_CODE: &str = "Intransit Store";

/// Options controlling pipeline behavior.
///
/// Every field has a default, so a TOML file only needs the keys it wants
/// to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReorderOptions {
    /// Store name that main-store batches and pending POs must carry.
    pub designated_store: String,

    /// Trailing window (days before the reference time) for PO creation dates.
    pub pending_po_window_days: i64,

    /// Absolute tolerance of the main-store quantity conservation check.
    pub conservation_tolerance: f64,

    /// Expected column count of the final table. Divergence is a warning.
    pub expected_output_columns: usize,

    /// Item code that must never survive into the global stock lookup.
    pub in_transit_code: String,

    /// Case-insensitive fragment that names the raw data section of the
    /// batch report workbook.
    pub raw_section_pattern: String,
}

impl Default for ReorderOptions {
    fn default() -> Self {
        Self {
            designated_store: DEFAULT_DESIGNATED_STORE.to_string(),
            pending_po_window_days: 90,
            conservation_tolerance: 0.01,
            expected_output_columns: 22,
            in_transit_code: DEFAULT_IN_TRANSIT_CODE.to_string(),
            raw_section_pattern: "raw".to_string(),
        }
    }
}

impl ReorderOptions {
    #[must_use]
    pub fn with_designated_store(mut self, store: impl Into<String>) -> Self {
        self.designated_store = store.into();
        self
    }

    #[must_use]
    pub fn with_pending_po_window_days(mut self, days: i64) -> Self {
        self.pending_po_window_days = days;
        self
    }
}
