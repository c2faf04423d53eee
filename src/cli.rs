//! CLI argument parsing for glscope

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "glscope")]
#[command(version)]
#[command(about = "Attribute GPU time in an apitrace capture to shaders and debug groups", long_about = None)]
pub struct Cli {
    /// Trace file to analyse with apitrace (dump + replay --pgpu)
    #[arg(
        value_name = "TRACE",
        required_unless_present_all = ["dump_log", "profile_log"],
        conflicts_with_all = ["dump_log", "profile_log"]
    )]
    pub trace: Option<PathBuf>,

    /// Path to the apitrace executable
    #[arg(long = "apitrace", value_name = "BIN", default_value = "apitrace")]
    pub apitrace: PathBuf,

    /// Read the call log from a saved `apitrace dump` output instead of running apitrace
    #[arg(long = "dump-log", value_name = "FILE", requires = "profile_log")]
    pub dump_log: Option<PathBuf>,

    /// Read the profile from a saved `apitrace replay --pgpu` output instead of running apitrace
    #[arg(long = "profile-log", value_name = "FILE", requires = "dump_log")]
    pub profile_log: Option<PathBuf>,

    /// Frame count for per-frame averages (default: from `apitrace info`, else 1)
    #[arg(long = "frames", value_name = "N")]
    pub frames: Option<i64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Analysis configuration file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calls after a debug group closes in which its timestamp reads are searched
    #[arg(long = "timer-window", value_name = "CALLS")]
    pub timer_window: Option<u64>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
