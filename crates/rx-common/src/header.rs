//! Header name normalization.
//!
//! Upstream exports are inconsistent about whitespace inside header names:
//! the batch report names its key column `Item\nCode` while downstream
//! lookups call it `Item Code`.

/// Collapses every run of whitespace (including newlines) into one space and
/// trims both ends. A leading UTF-8 BOM is dropped.
///
/// # Examples
///
/// ```
/// use rx_common::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("Item\nCode"), "Item Code");
/// assert_eq!(collapse_whitespace("  Qty.  "), "Qty.");
/// ```
pub fn collapse_whitespace(raw: &str) -> String {
    let trimmed = raw.trim_matches('\u{feff}').trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for part in trimmed.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(part);
    }
    normalized
}

/// Returns true when two header names are equal after whitespace collapsing.
pub fn headers_match(left: &str, right: &str) -> bool {
    collapse_whitespace(left) == collapse_whitespace(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace_newline() {
        assert_eq!(collapse_whitespace("Item\nCode"), "Item Code");
        assert_eq!(collapse_whitespace("Item \r\n  Code"), "Item Code");
    }

    #[test]
    fn test_collapse_whitespace_bom() {
        assert_eq!(collapse_whitespace("\u{feff}ItemCode"), "ItemCode");
    }

    #[test]
    fn test_headers_match() {
        assert!(headers_match("Item\nCode", "Item Code"));
        assert!(!headers_match("ItemCode", "Item Code"));
    }
}
