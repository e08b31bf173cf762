//! Pending purchase order aggregation.
//!
//! Only lines for the designated store created inside the trailing window
//! count. Lines whose creation date cannot be parsed are treated as not
//! recent.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rx_common::parse_f64;
use rx_model::columns::pending_po;
use rx_model::{PendingPoRecord, ReorderOptions};

use crate::lookup::StockLookup;
use crate::progress::Progress;

/// Pending quantity per item plus the per-filter drop counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPoAggregate {
    pub lookup: StockLookup,
    pub lines_loaded: usize,
    pub other_store: usize,
    pub unparsable_date: usize,
    pub outside_window: usize,
    pub missing_item_code: usize,
    pub non_numeric_quantity: usize,
}

impl PendingPoAggregate {
    pub fn lines_kept(&self) -> usize {
        self.lines_loaded
            - self.other_store
            - self.unparsable_date
            - self.outside_window
            - self.missing_item_code
            - self.non_numeric_quantity
    }
}

/// Earliest creation time that still falls inside the window ending at `now`.
pub fn window_start(now: NaiveDateTime, window_days: i64) -> NaiveDateTime {
    now - Duration::days(window_days)
}

/// Filters and sums pending PO lines by item code.
pub fn aggregate_pending_po(
    records: &[PendingPoRecord],
    options: &ReorderOptions,
    now: NaiveDateTime,
    progress: Progress<'_>,
) -> PendingPoAggregate {
    let cutoff = window_start(now, options.pending_po_window_days);
    let lines_loaded = records.len();
    progress.report(format!("Loaded {lines_loaded} PO lines"));

    let mut other_store = 0usize;
    let mut unparsable_date = 0usize;
    let mut outside_window = 0usize;
    let mut missing_item_code = 0usize;
    let mut non_numeric_quantity = 0usize;
    let mut pairs = Vec::new();

    for record in records {
        if record.store_name.as_deref().map(str::trim) != Some(options.designated_store.as_str()) {
            other_store += 1;
            continue;
        }
        let Some(created) = record.created.as_deref().and_then(parse_po_date) else {
            unparsable_date += 1;
            continue;
        };
        if created < cutoff {
            outside_window += 1;
            continue;
        }
        let Some(item_code) = record.item_code.clone() else {
            missing_item_code += 1;
            continue;
        };
        let Some(quantity) = record.pending_qty.as_deref().and_then(parse_f64) else {
            non_numeric_quantity += 1;
            continue;
        };
        pairs.push((item_code, quantity));
    }

    let kept = pairs.len();
    progress.report(format!(
        "{kept} lines after store + {}-day filter",
        options.pending_po_window_days
    ));
    if unparsable_date > 0 {
        tracing::debug!(unparsable_date, "PO lines with unparsable dates treated as not recent");
    }

    PendingPoAggregate {
        lookup: StockLookup::from_pairs(pending_po::ITEM_CODE, pending_po::PENDING_QTY, pairs),
        lines_loaded,
        other_store,
        unparsable_date,
        outside_window,
        missing_item_code,
        non_numeric_quantity,
    }
}

/// Parses a PO creation date. Date-only values are midnight.
///
/// Numeric day/month dates are month first whatever the separator
/// (`03/15/2024`, `05-03-2024` is May 3). Day first is only tried when the
/// leading field cannot be a month.
pub fn parse_po_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m-%d-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%d-%b-%Y %H:%M:%S",
    ];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    let date_formats = [
        "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d-%b-%Y", "%d-%m-%Y",
    ];
    for fmt in &date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_model::options::DEFAULT_DESIGNATED_STORE;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn aggregate(records: &[PendingPoRecord]) -> PendingPoAggregate {
        aggregate_pending_po(records, &ReorderOptions::default(), now(), Progress::silent())
    }

    #[test]
    fn parses_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for value in ["2024-03-15", "2024/03/15", "03/15/2024", "15-Mar-2024", "15-03-2024"] {
            assert_eq!(parse_po_date(value), Some(expected), "{value}");
        }
        assert_eq!(
            parse_po_date("2024-03-15 08:30:00"),
            expected.date().and_hms_opt(8, 30, 0)
        );
        assert_eq!(parse_po_date("soon"), None);
        assert_eq!(parse_po_date(""), None);
    }

    #[test]
    fn dash_dates_are_month_first() {
        let may_third = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_po_date("05-03-2024"), Some(may_third));
        assert_eq!(parse_po_date("05/03/2024"), Some(may_third));
        assert_eq!(
            parse_po_date("05-03-2024 14:10:00"),
            may_third.date().and_hms_opt(14, 10, 0)
        );
        assert_eq!(
            parse_po_date("25-03-2024"),
            NaiveDate::from_ymd_opt(2024, 3, 25).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn ambiguous_dash_date_inside_window_is_kept() {
        let records = vec![PendingPoRecord::new(
            "C1",
            DEFAULT_DESIGNATED_STORE,
            "05-03-2024",
            "10",
        )];
        let aggregate = aggregate(&records);
        assert_eq!(aggregate.outside_window, 0);
        assert_eq!(aggregate.lookup.get("C1"), Some(10.0));
    }

    #[test]
    fn line_older_than_window_is_excluded() {
        let records = vec![
            PendingPoRecord::new("C1", DEFAULT_DESIGNATED_STORE, &days_ago(95), "10"),
            PendingPoRecord::new("C1", DEFAULT_DESIGNATED_STORE, &days_ago(10), "4"),
        ];
        let aggregate = aggregate(&records);
        assert_eq!(aggregate.outside_window, 1);
        assert_eq!(aggregate.lookup.get("C1"), Some(4.0));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let records = vec![PendingPoRecord::new(
            "C1",
            DEFAULT_DESIGNATED_STORE,
            &days_ago(90),
            "6",
        )];
        assert_eq!(aggregate(&records).lookup.get("C1"), Some(6.0));
    }

    #[test]
    fn other_store_and_bad_dates_are_counted() {
        let records = vec![
            PendingPoRecord::new("C1", "Ward Store", &days_ago(1), "5"),
            PendingPoRecord::new("C2", DEFAULT_DESIGNATED_STORE, "not a date", "5"),
            PendingPoRecord::new("C3", DEFAULT_DESIGNATED_STORE, &days_ago(1), "x"),
        ];
        let aggregate = aggregate(&records);
        assert_eq!(aggregate.other_store, 1);
        assert_eq!(aggregate.unparsable_date, 1);
        assert_eq!(aggregate.non_numeric_quantity, 1);
        assert_eq!(aggregate.lines_kept(), 0);
        assert!(aggregate.lookup.is_empty());
    }
}
