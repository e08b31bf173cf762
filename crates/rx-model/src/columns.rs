//! Column names of the upstream exports and of the generated tables.
//!
//! Names are matched exactly as the exports spell them, including the
//! embedded newline in the batch report's `Item\nCode` header.

/// Global stock report (per location rows).
pub mod global_report {
    pub const ITEM_CODE: &str = "ItemCode";
    pub const DESCRIPTION: &str = "Description";
    pub const QTY: &str = "Qty";

    pub const REQUIRED: [&str; 3] = [ITEM_CODE, DESCRIPTION, QTY];
}

/// Global stock lookup (aggregator output).
pub mod global_lookup {
    pub const ITEM_CODE: &str = "Item Code";
    pub const TOTAL: &str = "Total Global Stock";
}

/// Batch-level stock report (main store aggregator input).
pub mod batch_report {
    pub const ITEM_CODE: &str = "Item\nCode";
    pub const QTY: &str = "Qty.";
    pub const STORE_NAME: &str = "Store Name";

    pub const REQUIRED: [&str; 3] = [ITEM_CODE, QTY, STORE_NAME];
}

/// Main store lookup (aggregator output).
pub mod main_store_lookup {
    pub const ITEM_CODE: &str = "Item Code";
    pub const TOTAL: &str = "Sum of Qty.";
}

/// Master item catalog.
pub mod master {
    pub const ITEM_CODE: &str = "Item\nCode";
    pub const ACTIVE: &str = "Current SKU (TRUE/FALSE)";
    pub const ADC: &str = "ADC";
    pub const MIN_STOCK: &str = "Min Stock Level";
    pub const MAX_STOCK: &str = "Max Stock Level";
    pub const PACK_SIZE: &str = "Pack size";
    /// Lowercase fragment identifying the optional unit cost column.
    pub const UNIT_COST_FRAGMENT: &str = "unit cost";

    pub const REQUIRED: [&str; 6] = [ITEM_CODE, ACTIVE, ADC, MIN_STOCK, MAX_STOCK, PACK_SIZE];
}

/// Pending purchase order feed.
pub mod pending_po {
    pub const ITEM_CODE: &str = "Item Code";
    pub const STORE_NAME: &str = "Store Name";
    pub const CREATED: &str = "POCreated Date";
    pub const PENDING_QTY: &str = "Pen.Qty";

    pub const REQUIRED: [&str; 4] = [ITEM_CODE, STORE_NAME, CREATED, PENDING_QTY];
}

/// Columns appended to the master catalog by the inventory calculator.
pub mod derived {
    pub const GLOBAL_STOCK: &str = "Global stock";
    pub const MAIN_STORE_STOCK: &str = "Main Store Stock";
    pub const PENDING_PO: &str = "Pending PO";
    pub const NET_STOCK: &str = "Net Stock";
    pub const GLOBAL_STOCK_DAYS: &str = "Global Stock Days";
    pub const MAIN_STORE_STOCK_DAYS: &str = "Main Store Stock Days";
    pub const REORDER_NEEDED: &str = "Reorder Needed?";
    pub const ORDER_QTY: &str = "Order Qty";
}
