//! Error types for trace analysis
//!
//! Most irregularities in the input streams are not errors: unrecognised call-log
//! lines, unmatched pops and malformed profiling rows are skipped. The variants
//! here are the conditions the analysis cannot recover from.

use thiserror::Error;

/// Errors that abort an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Could not find profiling header (a line starting with '#')")]
    MissingHeader,

    #[error("Profiling header is missing required column '{column}' (found: {found})")]
    MissingColumn { column: String, found: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
