//! Inventory calculator stage machine tests.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rx_engine::{
    CalculatorInputs, CancelFlag, InventoryCalculator, Progress, RecordingProgress, StockLookup,
};
use rx_model::columns::{derived, global_lookup, main_store_lookup};
use rx_model::options::DEFAULT_DESIGNATED_STORE;
use rx_model::{ErrorKind, PendingPoRecord, ReorderError, ReorderOptions, Stage};
use tempfile::TempDir;

const MASTER_HEADER: &str =
    "Item Code,Current SKU (TRUE/FALSE),ADC,Min Stock Level,Max Stock Level,Pack size,Unit Cost";

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn master_frame(rows: &[[&str; 7]]) -> DataFrame {
    let names = [
        "Item\nCode",
        "Current SKU (TRUE/FALSE)",
        "ADC",
        "Min Stock Level",
        "Max Stock Level",
        "Pack size",
        "Unit Cost",
    ];
    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let values: Vec<&str> = rows.iter().map(|row| row[col]).collect();
            Series::new((*name).into(), values).into()
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

fn f64_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

fn text_column(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

fn calculator() -> InventoryCalculator<'static> {
    InventoryCalculator::new(ReorderOptions::default(), Progress::silent())
}

#[test]
fn stages_run_in_order_and_sort_urgent_first() {
    let master = master_frame(&[
        ["A1", "TRUE", "10", "100", "500", "30", "2"],
        ["A2", "FALSE", "10", "100", "500", "30", "2"],
        ["A3", "true", "0", "10", "20", "5", "1"],
        ["A4", "1", "5", "100", "200", "50", ""],
    ]);
    let global = StockLookup::from_pairs(
        global_lookup::ITEM_CODE,
        global_lookup::TOTAL,
        vec![("A1", 80.0), ("A3", 50.0), ("A4", 20.0)],
    );
    let main_store = StockLookup::from_pairs(
        main_store_lookup::ITEM_CODE,
        main_store_lookup::TOTAL,
        vec![("A1", 12.0)],
    );
    let recent = (now() - Duration::days(5)).format("%Y-%m-%d").to_string();
    let old = (now() - Duration::days(95)).format("%Y-%m-%d").to_string();
    let po = vec![
        PendingPoRecord::new("A4", DEFAULT_DESIGNATED_STORE, &recent, "10"),
        PendingPoRecord::new("A4", DEFAULT_DESIGNATED_STORE, &old, "500"),
    ];

    let mut calc = calculator();
    calc.load_master(&master).unwrap();
    assert_eq!(calc.completed_stage(), Some(Stage::Load));
    assert_eq!(calc.data().height(), 3);
    calc.merge_global_stock(&global).unwrap();
    calc.merge_main_store_stock(&main_store).unwrap();
    let pending = calc.merge_pending_po(&po, now()).unwrap();
    assert_eq!(pending.outside_window, 1);
    calc.compute_metrics().unwrap();
    calc.validate().unwrap();
    let report = calc.export().unwrap();

    let df = &report.frame;
    assert_eq!(text_column(df, "Item\nCode"), vec!["A1", "A4", "A3"]);
    assert_eq!(f64_column(df, derived::ORDER_QTY), vec![420.0, 200.0, 0.0]);
    assert_eq!(f64_column(df, derived::NET_STOCK), vec![80.0, 30.0, 50.0]);
    assert_eq!(f64_column(df, derived::MAIN_STORE_STOCK), vec![12.0, 0.0, 0.0]);
    assert_eq!(f64_column(df, derived::GLOBAL_STOCK_DAYS), vec![8.0, 4.0, 0.0]);
    assert_eq!(df.width(), 15);

    let summary = &report.summary;
    assert_eq!(summary.master_rows, 4);
    assert_eq!(summary.active_rows, 3);
    assert_eq!(summary.reorder_items, 2);
    assert_eq!(summary.total_order_qty, 620.0);
    assert_eq!(summary.order_value, 840.0);
    assert_eq!(summary.warnings, vec!["expected 22 columns, got 15"]);
}

#[test]
fn stage_out_of_order_is_rejected() {
    let mut calc = calculator();
    let lookup = StockLookup::from_pairs("Item Code", "Total Global Stock", vec![("A1", 1.0)]);
    let err = calc.merge_global_stock(&lookup).unwrap_err();
    assert!(matches!(
        err,
        ReorderError::StageOrder {
            attempted: Stage::MergeGlobal,
            completed: None
        }
    ));

    calc.load_master(&master_frame(&[["A1", "TRUE", "1", "1", "2", "1", "1"]]))
        .unwrap();
    let err = calc.compute_metrics().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StageOrder);
    let err = calc
        .load_master(&master_frame(&[["A1", "TRUE", "1", "1", "2", "1", "1"]]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StageOrder);
}

#[test]
fn master_without_active_column_is_schema_mismatch() {
    let df = DataFrame::new(vec![Series::new("Item\nCode".into(), vec!["A1"]).into()]).unwrap();
    let err = calculator().load_master(&df).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
}

#[test]
fn cancellation_stops_at_next_stage() {
    let cancel = CancelFlag::new();
    let mut calc = calculator().with_cancel_flag(cancel.clone());
    calc.load_master(&master_frame(&[["A1", "TRUE", "1", "1", "2", "1", "1"]]))
        .unwrap();
    cancel.cancel();
    let lookup = StockLookup::from_pairs("Item Code", "Total Global Stock", vec![("A1", 1.0)]);
    let err = calc.merge_global_stock(&lookup).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(calc.completed_stage(), Some(Stage::Load));
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn run_reads_files_and_narrates() {
    let dir = TempDir::new().unwrap();
    let master = write(
        dir.path(),
        "master.csv",
        &format!("{MASTER_HEADER}\nA1,TRUE,10,100,500,30,2\nA2,TRUE,0,10,20,5,1\n"),
    );
    let global = write(
        dir.path(),
        "global.csv",
        "Item Code,Total Global Stock\nA1,80\nA2,50\n",
    );
    let main_store = write(dir.path(), "main.csv", "Item Code,Sum of Qty.\nA1,3\n");
    let po = write(
        dir.path(),
        "po.csv",
        &format!(
            "Item Code,Store Name,POCreated Date,Pen.Qty\nA2,{DEFAULT_DESIGNATED_STORE},2024-06-01,4\n"
        ),
    );

    let sink = RecordingProgress::new();
    let inputs = CalculatorInputs {
        master,
        global_stock: global,
        main_store,
        pending_po: po,
    };
    let report = InventoryCalculator::new(ReorderOptions::default(), Progress::new(&sink))
        .run(&inputs, now())
        .unwrap();

    assert_eq!(report.summary.total_items, 2);
    assert_eq!(report.summary.reorder_items, 1);
    assert_eq!(report.summary.items_with_pending_po, 1);
    assert_eq!(f64_column(&report.frame, derived::ORDER_QTY), vec![420.0, 0.0]);
    let messages = sink.messages();
    assert!(messages.iter().any(|m| m == "2 active SKUs (of 2 total)"));
    assert!(messages.iter().any(|m| m == "All validations passed"));
}

#[test]
fn run_tags_missing_file_with_stage() {
    let dir = TempDir::new().unwrap();
    let master = write(
        dir.path(),
        "master.csv",
        &format!("{MASTER_HEADER}\nA1,TRUE,1,1,2,1,1\n"),
    );
    let inputs = CalculatorInputs {
        master,
        global_stock: dir.path().join("missing_global.csv"),
        main_store: dir.path().join("missing_main.csv"),
        pending_po: dir.path().join("missing_po.csv"),
    };
    let err = calculator().run(&inputs, now()).unwrap_err();
    assert_eq!(err.stage, Stage::MergeGlobal);
    assert_eq!(err.kind(), ErrorKind::MissingFile);
}
