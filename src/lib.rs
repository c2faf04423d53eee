//! glscope - GPU time attribution for apitrace captures
//!
//! Correlates program labels, debug-group push/pop markers and manual
//! GL_TIMESTAMP query pairs from an `apitrace dump` call log with the per-call
//! GPU profile from `apitrace replay --pgpu`, producing time-by-shader and
//! time-by-debug-group-instance reports.

pub mod analysis;
pub mod apitrace;
pub mod attribution;
pub mod call_log;
pub mod cli;
pub mod config;
pub mod error;
pub mod markers;
pub mod report;
