//! Shared utilities for the pharmacy reorder crates.
//!
//! This crate provides common utilities used across the workspace,
//! including Polars `AnyValue` coercion helpers and header normalization.

pub mod header;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use header::{collapse_whitespace, headers_match};
pub use polars::{
    any_to_bool, any_to_f64, any_to_string, any_to_string_non_empty, format_numeric, parse_bool,
    parse_f64,
};
