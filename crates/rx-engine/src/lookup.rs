//! Grouped quantity lookups and left joins.
//!
//! Every pipeline reduces rows to one total per item code and then joins
//! those totals onto another table, defaulting the misses. [`StockLookup`]
//! is that reduction; [`StockLookup::left_join`] is the join.

use std::collections::BTreeMap;

use polars::prelude::*;
use rx_common::any_to_f64;
use rx_ingest::{cell_text, resolve_column};
use rx_model::{ReorderError, Result};

/// Quantity totals keyed by item code, iterated in byte order of the key.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLookup {
    key_column: String,
    value_column: String,
    totals: BTreeMap<String, f64>,
}

impl StockLookup {
    /// Groups `(key, quantity)` pairs, summing the quantities of equal keys.
    pub fn from_pairs<I, K>(key_column: &str, value_column: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (key, quantity) in pairs {
            *totals.entry(key.into()).or_insert(0.0) += quantity;
        }
        Self {
            key_column: key_column.to_string(),
            value_column: value_column.to_string(),
            totals,
        }
    }

    /// Reads a lookup table back from a frame.
    ///
    /// The key column is the first of `key_candidates` present (whitespace
    /// tolerant). Rows with a blank key or non-numeric value are skipped.
    pub fn from_frame(
        df: &DataFrame,
        key_candidates: &[&str],
        value_column: &str,
        context: &str,
    ) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let key = key_candidates
            .iter()
            .find_map(|candidate| resolve_column(&names, candidate));
        let value = resolve_column(&names, value_column);
        let (Some(key), Some(value)) = (key, value) else {
            let mut missing = Vec::new();
            if key_candidates
                .iter()
                .all(|candidate| resolve_column(&names, candidate).is_none())
            {
                missing.push(key_candidates.join(" | "));
            }
            if resolve_column(&names, value_column).is_none() {
                missing.push(value_column.to_string());
            }
            return Err(ReorderError::SchemaMismatch {
                context: context.to_string(),
                missing,
                available: names,
            });
        };

        let key_col = df.column(&key)?;
        let value_col = df.column(&value)?;
        let mut pairs = Vec::with_capacity(df.height());
        let mut skipped = 0usize;
        for idx in 0..df.height() {
            let code = cell_text(key_col, idx);
            let quantity = any_to_f64(value_col.get(idx).unwrap_or(AnyValue::Null));
            match (code, quantity) {
                (Some(code), Some(quantity)) => pairs.push((code, quantity)),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(context, skipped, "lookup rows without key or value skipped");
        }
        Ok(Self::from_pairs(&key, value_column, pairs))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.totals.get(key).copied()
    }

    /// Sum of all totals.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(key, total)| (key.as_str(), *total))
    }

    /// Two-column frame sorted by key.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let keys: Vec<&str> = self.totals.keys().map(String::as_str).collect();
        let values: Vec<f64> = self.totals.values().copied().collect();
        let df = DataFrame::new(vec![
            Series::new(self.key_column.as_str().into(), keys).into(),
            Series::new(self.value_column.as_str().into(), values).into(),
        ])?;
        Ok(df)
    }

    /// Adds (or replaces) `target` on `df` with the total of each row's
    /// `base_key` value, or `fill` when the key has no total.
    ///
    /// Returns the number of rows that matched a total.
    pub fn left_join(
        &self,
        df: &mut DataFrame,
        base_key: &str,
        target: &str,
        fill: f64,
    ) -> Result<usize> {
        let keys = df.column(base_key)?;
        let mut matched = 0usize;
        let values: Vec<f64> = (0..df.height())
            .map(|idx| {
                match cell_text(keys, idx).and_then(|code| self.get(&code)) {
                    Some(total) => {
                        matched += 1;
                        total
                    }
                    None => fill,
                }
            })
            .collect();
        df.with_column(Series::new(target.into(), values))?;
        Ok(matched)
    }
}
