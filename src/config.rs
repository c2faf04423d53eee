//! Analysis configuration
//!
//! Every knob has a default matching apitrace's output and the label conventions
//! used by the renderer being profiled, so an empty (or absent) config file gives
//! the stock behaviour. Values can be loaded from TOML:
//!
//! ```toml
//! timer_window = 20
//!
//! [columns]
//! gpu_duration = "gpu_dura"
//!
//! [attribution]
//! shader_markers = ["IBL/"]
//! label_markers = ["IBL:"]
//! shader_substring = "shaders/"
//! ```

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default lookahead (in calls) after a debug group closes in which its two
/// timestamp reads are expected.
pub const DEFAULT_TIMER_WINDOW: u64 = 15;

/// Configuration for one analysis run
///
/// # Example
/// ```
/// use glscope::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.timer_window, 15);
/// assert_eq!(config.columns.call, "no");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Inclusive lookahead window `[end, end + timer_window]` for timestamp reads
    pub timer_window: u64,

    /// Column names in the profiling header
    pub columns: ProfileColumns,

    /// Naming conventions for the app-timer attribution policy
    pub attribution: AttributionConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timer_window: DEFAULT_TIMER_WINDOW,
            columns: ProfileColumns::default(),
            attribution: AttributionConfig::default(),
        }
    }
}

/// Names of the required columns in `apitrace replay --pgpu` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileColumns {
    /// Call index column
    pub call: String,
    /// Per-call GPU duration column (nanoseconds)
    pub gpu_duration: String,
    /// Bound program id column
    pub program: String,
}

impl Default for ProfileColumns {
    fn default() -> Self {
        Self {
            call: "no".to_string(),
            gpu_duration: "gpu_dura".to_string(),
            program: "program".to_string(),
        }
    }
}

/// Substrings that mark manually timed regions and labelled shaders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// A shader whose name contains any of these is a candidate for app-timer attribution
    pub shader_markers: Vec<String>,

    /// A region whose label contains any of these is a candidate for app-timer attribution
    pub label_markers: Vec<String>,

    /// Shaders lacking this substring are unlabeled/internal and never receive app time
    pub shader_substring: String,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            shader_markers: vec!["IBL/".to_string()],
            label_markers: vec!["IBL:".to_string()],
            shader_substring: "shaders/".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate().map_err(AnalysisError::Config)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let columns = [
            ("call", &self.columns.call),
            ("gpu_duration", &self.columns.gpu_duration),
            ("program", &self.columns.program),
        ];
        for (key, name) in columns {
            if name.trim().is_empty() {
                return Err(format!("columns.{} must not be empty", key));
            }
        }

        if self.columns.call == self.columns.gpu_duration
            || self.columns.call == self.columns.program
            || self.columns.gpu_duration == self.columns.program
        {
            return Err("profiling column names must be distinct".to_string());
        }

        if self.attribution.shader_markers.iter().any(String::is_empty)
            || self.attribution.label_markers.iter().any(String::is_empty)
        {
            return Err("attribution markers must not be empty strings".to_string());
        }

        Ok(())
    }
}
