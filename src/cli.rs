//! CLI argument parsing for the recuerdo inspector

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for inspected samples
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "recuerdo")]
#[command(version)]
#[command(about = "Inspect reservoir-sampled function call recordings", long_about = None)]
pub struct Cli {
    /// Destination root produced by a recording run
    pub root: PathBuf,

    /// Limit inspection to one recorder subdirectory (e.g. parse_request_000)
    #[arg(short = 'f', long = "function", value_name = "NAME")]
    pub function: Option<String>,

    /// Dump a single sample slot (requires --function)
    #[arg(short = 's', long = "slot", value_name = "INDEX")]
    pub slot: Option<usize>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug output on stderr
    #[arg(short, long)]
    pub debug: bool,
}
