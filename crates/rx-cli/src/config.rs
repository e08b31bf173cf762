//! Pipeline options from a TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rx_model::ReorderOptions;

/// Reads options from `path`, or the defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<ReorderOptions> {
    let Some(path) = path else {
        return Ok(ReorderOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options: ReorderOptions =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?options, "loaded config");
    Ok(options)
}

/// Applies the store and window flags on top of file values.
pub fn apply_overrides(
    mut options: ReorderOptions,
    store: Option<&str>,
    window_days: Option<i64>,
) -> ReorderOptions {
    if let Some(store) = store {
        options = options.with_designated_store(store);
    }
    if let Some(days) = window_days {
        options = options.with_pending_po_window_days(days);
    }
    options
}

/// Reference time of the pending PO window: midnight of `as_of`, or the local
/// wall clock.
pub fn reference_time(as_of: Option<NaiveDate>) -> NaiveDateTime {
    match as_of {
        Some(date) => date.and_time(NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}
