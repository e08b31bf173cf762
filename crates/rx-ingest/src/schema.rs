//! Required-column resolution.

use polars::prelude::{AnyValue, Column, DataFrame};
use rx_common::{any_to_string_non_empty, headers_match};
use rx_model::{ReorderError, Result};

/// Finds the header that stands for `expected`.
///
/// An exact match wins. Otherwise a header equal to `expected` after
/// whitespace collapsing is accepted, so `Item Code` resolves `Item\nCode`.
pub fn resolve_column(names: &[String], expected: &str) -> Option<String> {
    if let Some(exact) = names.iter().find(|name| name.as_str() == expected) {
        return Some(exact.clone());
    }
    let found = names.iter().find(|name| headers_match(name, expected))?;
    tracing::debug!(expected = ?expected, found = ?found, "matched column by normalized name");
    Some(found.clone())
}

/// Resolves every required column or fails with all missing names at once.
///
/// The returned names are in the order of `required`.
pub fn require_columns(df: &DataFrame, required: &[&str], context: &str) -> Result<Vec<String>> {
    let names = column_names(df);
    let mut resolved = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for expected in required {
        match resolve_column(&names, expected) {
            Some(name) => resolved.push(name),
            None => missing.push((*expected).to_string()),
        }
    }
    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(ReorderError::SchemaMismatch {
            context: context.to_string(),
            missing,
            available: names,
        })
    }
}

/// First column whose lowercase name contains `fragment`.
pub fn find_column_containing(df: &DataFrame, fragment: &str) -> Option<String> {
    let fragment = fragment.to_lowercase();
    column_names(df)
        .into_iter()
        .find(|name| name.to_lowercase().contains(&fragment))
}

/// Non-blank text of one cell.
pub fn cell_text(column: &Column, idx: usize) -> Option<String> {
    any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null))
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn frame(names: &[&str]) -> DataFrame {
        let columns: Vec<Column> = names
            .iter()
            .map(|name| Series::new((*name).into(), vec!["x"]).into())
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_require_columns_exact() {
        let df = frame(&["ItemCode", "Description", "Qty"]);
        let resolved = require_columns(&df, &["Qty", "ItemCode"], "report").unwrap();
        assert_eq!(resolved, vec!["Qty", "ItemCode"]);
    }

    #[test]
    fn test_require_columns_whitespace_variant() {
        let df = frame(&["Item Code", "Qty.", "Store Name"]);
        let resolved = require_columns(&df, &["Item\nCode"], "batches").unwrap();
        assert_eq!(resolved, vec!["Item Code"]);
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let df = frame(&["ItemCode"]);
        let err = require_columns(&df, &["ItemCode", "Description", "Qty"], "report").unwrap_err();
        match err {
            ReorderError::SchemaMismatch {
                missing, available, ..
            } => {
                assert_eq!(missing, vec!["Description", "Qty"]);
                assert_eq!(available, vec!["ItemCode"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_find_column_containing_is_case_insensitive() {
        let df = frame(&["Item\nCode", "Unit Cost (INR)"]);
        assert_eq!(
            find_column_containing(&df, "unit cost"),
            Some("Unit Cost (INR)".to_string())
        );
        assert_eq!(find_column_containing(&df, "vendor"), None);
    }
}
