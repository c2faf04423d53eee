//! Flat reports over a finished analysis
//!
//! Reports are plain sorted row vectors. Renderers in the submodules turn them
//! into console tables, JSON or CSV; none of them touch analysis state.

pub mod csv;
pub mod json;
pub mod text;

use crate::attribution::ShaderStats;
use crate::markers::{MarkerId, MarkerInstance};
use serde::Serialize;

/// Normalise an optional frame count for per-frame averages
///
/// Missing, zero or negative counts become 1.
///
/// # Example
/// ```
/// use glscope::report::normalize_frame_count;
///
/// assert_eq!(normalize_frame_count(Some(120)), 120);
/// assert_eq!(normalize_frame_count(Some(0)), 1);
/// assert_eq!(normalize_frame_count(None), 1);
/// ```
pub fn normalize_frame_count(frames: Option<i64>) -> u64 {
    match frames {
        Some(n) if n > 0 => n as u64,
        _ => 1,
    }
}

/// One row of the per-shader report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShaderRow {
    pub name: String,
    pub draws: u64,
    pub gpu_time_ns: u64,
    pub app_timer_ns: u64,
}

impl ShaderRow {
    /// Sort key: the larger of driver GPU time and credited app-timer time
    pub fn weight(&self) -> u64 {
        self.gpu_time_ns.max(self.app_timer_ns)
    }

    pub fn gpu_per_frame_ms(&self, frame_count: u64) -> f64 {
        ns_to_ms(self.gpu_time_ns) / frame_count.max(1) as f64
    }
}

/// One row of the per-debug-group-instance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerRow {
    pub id: MarkerId,
    pub label: String,
    pub start: u64,
    pub end: u64,
    pub calls: u64,
    pub gpu_time_ns: u64,
    pub timer_ns: u64,
    pub has_own_timer: bool,
    pub is_sum: bool,
}

impl From<&MarkerInstance> for MarkerRow {
    fn from(marker: &MarkerInstance) -> Self {
        Self {
            id: marker.id,
            label: marker.label.clone(),
            start: marker.start,
            end: marker.end,
            calls: marker.calls,
            gpu_time_ns: marker.gpu_time,
            timer_ns: marker.duration_ns(),
            has_own_timer: marker.has_own_timer(),
            is_sum: marker.is_sum(),
        }
    }
}

/// Counts describing what the run consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub shader_labels: usize,
    pub marker_instances: usize,
    pub timestamp_fetches: usize,
    pub unmatched_pops: usize,
    pub unclosed_pushes: usize,
    pub rows_attributed: u64,
    pub rows_skipped: u64,
}

/// Both aggregate reports plus run metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub frame_count: u64,
    pub summary: RunSummary,
    /// Descending by [`ShaderRow::weight`]; ties keep first-seen order
    pub shaders: Vec<ShaderRow>,
    /// Ascending by start call; ties keep instance order
    pub markers: Vec<MarkerRow>,
}

impl AnalysisReport {
    pub fn new(
        stats: &ShaderStats,
        markers: &[MarkerInstance],
        summary: RunSummary,
        frame_count: u64,
    ) -> Self {
        let mut shaders: Vec<ShaderRow> = stats
            .iter()
            .map(|(name, stat)| ShaderRow {
                name: name.to_string(),
                draws: stat.draws,
                gpu_time_ns: stat.gpu_time,
                app_timer_ns: stat.app_timer,
            })
            .collect();
        shaders.sort_by(|a, b| b.weight().cmp(&a.weight()));

        let mut markers: Vec<MarkerRow> = markers.iter().map(MarkerRow::from).collect();
        markers.sort_by_key(|m| m.start);

        Self {
            frame_count: frame_count.max(1),
            summary,
            shaders,
            markers,
        }
    }
}

pub(crate) fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / 1e6
}
