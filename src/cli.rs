//! CLI argument parsing for pageperf

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Output format for the latency report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "pageperf")]
#[command(version)]
#[command(about = "Per-path latency tier report for web access logs", long_about = None)]
pub struct Cli {
    /// Access log with one `<path> <latency_ms>` record per line ("-" for stdin)
    #[arg(value_name = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Output format [default: text]
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip malformed lines and report how many were dropped
    #[arg(short = 's', long = "skip-malformed")]
    pub skip_malformed: bool,

    /// List every tier for each path, including tiers with no requests
    #[arg(short = 'a', long = "show-empty-tiers")]
    pub show_empty_tiers: bool,

    /// Read settings from a TOML file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// True when the log should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.log_file.as_os_str() == "-"
    }
}
