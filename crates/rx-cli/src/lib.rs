//! CLI library components for the reorder tool.

pub mod commands;
pub mod config;
pub mod logging;
pub mod progress;
pub mod types;
