//! Polars AnyValue utility functions.
//!
//! Every input table is read with text columns, so these helpers are the one
//! place where cells are coerced into strings, quantities and flags.

use polars::prelude::*;

/// Renders a cell the way it is written to the output sheets.
///
/// Null is empty, floats drop trailing zeros and booleans are `TRUE`/`FALSE`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use rx_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("A100")), "A100");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        other => match other.extract::<i64>() {
            Some(whole) if other.dtype().is_integer() => whole.to_string(),
            _ => other.to_string(),
        },
    }
}

/// [`any_to_string`], or `None` for a blank cell.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Shortest decimal form of a quantity: `15.0` is `15`, `-0.0` is `0`.
///
/// # Examples
///
/// ```
/// use rx_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// assert_eq!(format_numeric(420.0), "420");
/// ```
pub fn format_numeric(v: f64) -> String {
    // `Display` for f64 already omits a fractional part on whole values.
    if v == 0.0 { "0".to_string() } else { v.to_string() }
}

/// Reads a cell as a quantity. Text cells are parsed after trimming; null,
/// boolean and non-finite values have no quantity.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        other if other.dtype().is_primitive_numeric() => {
            other.extract::<f64>().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid, empty, or
/// non-finite values.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Converts an `AnyValue` to a flag. Only boolean true, the text `true`
/// (any case) and the number 1 are true.
pub fn any_to_bool(value: AnyValue<'_>) -> bool {
    match value {
        AnyValue::Boolean(b) => b,
        AnyValue::String(s) => parse_bool(s),
        AnyValue::StringOwned(s) => parse_bool(&s),
        other => any_to_f64(other).is_some_and(|v| v == 1.0),
    }
}

/// Parses a text flag. See [`any_to_bool`].
pub fn parse_bool(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.eq_ignore_ascii_case("true") || parse_f64(trimmed).is_some_and(|v| v == 1.0)
}
