//! Raw input rows, exactly as the upstream exports deliver them.
//!
//! Cells are kept as optional text: blank and unparsable values are
//! row-level defects handled by the cleaning filters, not by the loader.

use serde::{Deserialize, Serialize};

/// One (item, location) observation of the global stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStockRecord {
    pub item_code: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
}

impl RawStockRecord {
    pub fn new(item_code: &str, description: &str, quantity: &str) -> Self {
        Self {
            item_code: non_blank(item_code),
            description: non_blank(description),
            quantity: non_blank(quantity),
        }
    }
}

/// One batch of the batch-level stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBatchRecord {
    pub item_code: Option<String>,
    pub store_name: Option<String>,
    pub quantity: Option<String>,
}

impl RawBatchRecord {
    pub fn new(item_code: &str, store_name: &str, quantity: &str) -> Self {
        Self {
            item_code: non_blank(item_code),
            store_name: non_blank(store_name),
            quantity: non_blank(quantity),
        }
    }
}

/// One purchase order line of the pending PO feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPoRecord {
    pub item_code: Option<String>,
    pub store_name: Option<String>,
    pub created: Option<String>,
    pub pending_qty: Option<String>,
}

impl PendingPoRecord {
    pub fn new(item_code: &str, store_name: &str, created: &str, pending_qty: &str) -> Self {
        Self {
            item_code: non_blank(item_code),
            store_name: non_blank(store_name),
            created: non_blank(created),
            pending_qty: non_blank(pending_qty),
        }
    }
}

/// Returns the value when it holds anything but whitespace.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_become_none() {
        let record = RawStockRecord::new("A2", "  ", "3");
        assert_eq!(record.description, None);
        assert_eq!(record.quantity.as_deref(), Some("3"));
    }
}
