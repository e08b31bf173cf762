//! Summary tables printed after each command.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rx_cli::types::{CalculateOutcome, GlobalStockOutcome, MainStoreOutcome, RunOutcome};

pub fn print_global_summary(outcome: &GlobalStockOutcome) {
    let report = &outcome.report;
    let mut table = summary_table("GLOBAL STOCK LOOKUP");
    table.add_row(count_row("Input rows", report.input_rows));
    table.add_row(dropped_row("Blank Description", report.blank_description));
    table.add_row(dropped_row("Blank Qty", report.blank_quantity));
    table.add_row(dropped_row("Non-numeric Qty", report.non_numeric_quantity));
    table.add_row(dropped_row("Blank ItemCode", report.missing_item_code));
    table.add_row(count_row("Unique items", report.unique_items()));
    table.add_row(quantity_row("Total stock qty", report.total_quantity(), 0));
    table.add_row(text_row("Output file", &outcome.output.display().to_string()));
    println!("{table}");
}

pub fn print_main_store_summary(outcome: &MainStoreOutcome) {
    let report = &outcome.report;
    let mut table = summary_table("MAIN STORE STOCK LOOKUP");
    if let Some(section) = &report.section {
        table.add_row(text_row("Section", section));
    }
    table.add_row(count_row("Input batches", report.input_rows));
    table.add_row(dropped_row("Other stores", report.other_store));
    table.add_row(dropped_row("Missing Item Codes", report.missing_item_code));
    table.add_row(dropped_row("Missing Quantities", report.missing_quantity));
    table.add_row(dropped_row("Non-numeric Qty.", report.non_numeric_quantity));
    table.add_row(count_row("Unique items", report.unique_items()));
    table.add_row(quantity_row("Total stock qty", report.total_quantity(), 2));
    table.add_row(text_row("Output file", &outcome.output.display().to_string()));
    println!("{table}");
}

pub fn print_inventory_summary(outcome: &CalculateOutcome) {
    let summary = &outcome.report.summary;
    let mut table = summary_table("INVENTORY CALCULATION");
    table.add_row(count_row("Active SKUs", summary.active_rows));
    table.add_row(count_row("Master rows", summary.master_rows));
    table.add_row(count_row("Total items processed", summary.total_items));
    table.add_row(count_row("Items with global stock", summary.items_with_global_stock));
    table.add_row(count_row(
        "Items with main store stock",
        summary.items_with_main_store_stock,
    ));
    table.add_row(count_row("Items with pending PO", summary.items_with_pending_po));
    table.add_row(count_row("PO lines in window", summary.po_lines_kept));
    table.add_row(vec![
        Cell::new("Items needing reorder"),
        Cell::new(summary.reorder_items)
            .fg(if summary.reorder_items > 0 {
                Color::Red
            } else {
                Color::Green
            })
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(quantity_row("Total order quantity", summary.total_order_qty, 0));
    let value_label = match &summary.unit_cost_column {
        Some(column) => format!("Est. order value ({column})"),
        None => "Est. order value".to_string(),
    };
    table.add_row(quantity_row(&value_label, summary.order_value, 2));
    table.add_row(quantity_row(
        "Avg global stock days",
        summary.mean_global_stock_days,
        1,
    ));
    table.add_row(quantity_row(
        "Avg main store days",
        summary.mean_main_store_stock_days,
        1,
    ));
    table.add_row(text_row("Output file", &outcome.output.display().to_string()));
    println!("{table}");
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
}

pub fn print_run_summary(outcome: &RunOutcome) {
    print_global_summary(&outcome.global);
    print_main_store_summary(&outcome.main_store);
    print_inventory_summary(&outcome.inventory);
}

fn summary_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(title), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn count_row(label: &str, value: usize) -> Vec<Cell> {
    vec![Cell::new(label), Cell::new(group_digits(&value.to_string()))]
}

fn dropped_row(label: &str, value: usize) -> Vec<Cell> {
    let cell = if value > 0 {
        Cell::new(group_digits(&value.to_string())).fg(Color::Yellow)
    } else {
        dim_cell(value)
    };
    vec![Cell::new(format!("  removed: {label}")), cell]
}

fn quantity_row(label: &str, value: f64, decimals: usize) -> Vec<Cell> {
    vec![Cell::new(label), Cell::new(format_quantity(value, decimals))]
}

fn text_row(label: &str, value: &str) -> Vec<Cell> {
    vec![Cell::new(label), dim_cell(value)]
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Formats with thousands separators, e.g. `12,345.60`.
fn format_quantity(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match unsigned.split_once('.') {
        Some((whole, fraction)) => format!("{sign}{}.{fraction}", group_digits(whole)),
        None => format!("{sign}{}", group_digits(unsigned)),
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
