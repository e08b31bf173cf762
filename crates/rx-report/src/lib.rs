//! Persistence of the reorder tables.
//!
//! Tables are written as CSV through a temporary file that is renamed over
//! the target only once fully written and synced, so a failed run never
//! leaves a partial file at the target path.

mod error;
mod writer;

pub use error::{ExportError, Result};
pub use writer::{frame_rows, temp_path_for, write_csv_atomic};

/// Default file name of the global stock lookup.
pub const GLOBAL_STOCK_LOOKUP_FILE: &str = "Material_Global_Stock_Lookup.csv";

/// Default file name of the main store stock lookup.
pub const MAIN_STORE_LOOKUP_FILE: &str = "Material_Main_Store_Stock_Lookup.csv";

/// Default file name of the inventory calculation.
pub const INVENTORY_CALCULATION_FILE: &str = "INVENTORY_CALCULATION.csv";
