//! CLI argument definitions for the reorder tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rx-reorder",
    version,
    about = "Pharmacy reorder calculator - reconcile stock exports into a reorder sheet",
    long_about = "Reconcile pharmacy inventory exports into a single reorder decision sheet.\n\n\
                  Aggregates global and main store stock, merges recent pending purchase\n\
                  orders and derives reorder flags and pack-rounded order quantities."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML file with pipeline options (store, window, tolerance, ...).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable the progress spinner.
    #[arg(long = "no-progress", global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the global stock lookup from the per-location stock report.
    GlobalStock(GlobalStockArgs),

    /// Build the main store stock lookup from the batch stock report.
    MainStore(MainStoreArgs),

    /// Compute the inventory calculation sheet from prepared lookups.
    Calculate(CalculateArgs),

    /// Run all three steps and write every output into one directory.
    Run(RunArgs),
}

#[derive(Args)]
pub struct GlobalStockArgs {
    /// Global stock report CSV.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV (default: Material_Global_Stock_Lookup.csv).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct MainStoreArgs {
    /// Batch stock report: a CSV file or a directory of section CSVs.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output CSV (default: Material_Main_Store_Stock_Lookup.csv).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Designated store name (overrides the config file).
    #[arg(long = "store", value_name = "NAME")]
    pub store: Option<String>,
}

#[derive(Args)]
pub struct CalculateArgs {
    /// Master item catalog CSV.
    #[arg(long = "master", value_name = "PATH")]
    pub master: PathBuf,

    /// Global stock lookup CSV.
    #[arg(long = "global-stock", value_name = "PATH")]
    pub global_stock: PathBuf,

    /// Main store stock lookup CSV.
    #[arg(long = "main-store", value_name = "PATH")]
    pub main_store: PathBuf,

    /// Pending purchase order feed.
    #[arg(long = "pending-po", value_name = "PATH")]
    pub pending_po: PathBuf,

    /// Output CSV (default: INVENTORY_CALCULATION.csv).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Global stock report CSV.
    #[arg(long = "stock-report", value_name = "PATH")]
    pub stock_report: PathBuf,

    /// Batch stock report: a CSV file or a directory of section CSVs.
    #[arg(long = "batch-report", value_name = "PATH")]
    pub batch_report: PathBuf,

    /// Master item catalog CSV.
    #[arg(long = "master", value_name = "PATH")]
    pub master: PathBuf,

    /// Pending purchase order feed.
    #[arg(long = "pending-po", value_name = "PATH")]
    pub pending_po: PathBuf,

    /// Directory for the three output files (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,
}

/// Options shared by the commands that merge pending POs.
#[derive(Args)]
pub struct WindowArgs {
    /// Reference date for the pending PO window (default: now).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    /// Designated store name (overrides the config file).
    #[arg(long = "store", value_name = "NAME")]
    pub store: Option<String>,

    /// Pending PO window in days (overrides the config file).
    #[arg(long = "window-days", value_name = "DAYS")]
    pub window_days: Option<i64>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
