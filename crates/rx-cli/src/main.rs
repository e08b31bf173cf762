//! Pharmacy reorder CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use rx_cli::commands::{RunInputs, run_all, run_calculate, run_global_stock, run_main_store};
use rx_cli::config::{apply_overrides, load_options, reference_time};
use rx_cli::logging::{LogConfig, LogFormat, init_logging};
use rx_cli::progress::SpinnerProgress;
use rx_engine::CalculatorInputs;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{
    print_global_summary, print_inventory_summary, print_main_store_summary, print_run_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let spinner = if cli.no_progress || !io::stderr().is_terminal() {
        SpinnerProgress::hidden()
    } else {
        SpinnerProgress::new()
    };
    let result = run_command(&cli, &spinner);
    spinner.finish();

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_command(cli: &Cli, spinner: &SpinnerProgress) -> Result<()> {
    let options = load_options(cli.config.as_deref())?;
    match &cli.command {
        Command::GlobalStock(args) => {
            let outcome = run_global_stock(&args.input, args.output.clone(), &options, spinner)?;
            spinner.finish();
            print_global_summary(&outcome);
        }
        Command::MainStore(args) => {
            let options = apply_overrides(options, args.store.as_deref(), None);
            let outcome = run_main_store(&args.input, args.output.clone(), &options, spinner)?;
            spinner.finish();
            print_main_store_summary(&outcome);
        }
        Command::Calculate(args) => {
            let options = apply_overrides(
                options,
                args.window.store.as_deref(),
                args.window.window_days,
            );
            let inputs = CalculatorInputs {
                master: args.master.clone(),
                global_stock: args.global_stock.clone(),
                main_store: args.main_store.clone(),
                pending_po: args.pending_po.clone(),
            };
            let now = reference_time(args.window.as_of);
            let outcome = run_calculate(&inputs, args.output.clone(), &options, now, spinner)?;
            spinner.finish();
            print_inventory_summary(&outcome);
        }
        Command::Run(args) => {
            let options = apply_overrides(
                options,
                args.window.store.as_deref(),
                args.window.window_days,
            );
            let inputs = RunInputs {
                stock_report: args.stock_report.clone(),
                batch_report: args.batch_report.clone(),
                master: args.master.clone(),
                pending_po: args.pending_po.clone(),
                output_dir: args.output_dir.clone(),
            };
            let now = reference_time(args.window.as_of);
            let outcome = run_all(&inputs, &options, now, spinner)?;
            spinner.finish();
            print_run_summary(&outcome);
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
