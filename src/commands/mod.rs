mod config;
mod extract;

pub use config::print_config;
pub use extract::extract;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use st_vision::ChartConfig;

#[derive(Debug, Parser)]
#[command(name = "screentime")]
#[command(version, about = "Hourly usage from Screen Time screenshots", long_about = None)]
pub struct Cli {
    /// Chart detection overrides (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log every pipeline stage (unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the hourly chart from screenshot files or directories
    Extract(ExtractArgs),
    /// Print the effective chart configuration as JSON
    Config,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Screenshot files or directories
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Legend labels of the colored fills in order, e.g. "Social,Entertainment"
    #[arg(long, value_name = "LABELS", value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Directory with an optional categories.json extending the builtin table
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Minutes represented by the top gridline
    #[arg(long, value_name = "MINUTES", default_value_t = st_usage::DEFAULT_FULL_SCALE_MINUTES)]
    pub full_scale: u32,

    /// Write a <stem>_debug.png overlay per screenshot into this directory
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Screenshots processed concurrently
    #[arg(short = 'j', long, value_name = "N", default_value_t = 4)]
    pub jobs: usize,
}

/// The builtin configuration, or the override file given with `--config`.
pub fn resolve_config(path: Option<&PathBuf>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::load(path),
        None => Ok(ChartConfig::builtin().clone()),
    }
}
