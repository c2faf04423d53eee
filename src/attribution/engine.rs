// Attribution of profiled calls to shaders and debug-group instances
//
// Single forward scan. Every sample counts towards its shader and its narrowest
// enclosing marker; a marker's own timer is credited to a shader at most once.

use super::policy::AppTimerPolicy;
use super::profile::{ProfileHeader, ProfileSample};
use crate::call_log::{ProgramId, ProgramLabels};
use crate::markers::{locate_index, MarkerId, MarkerInstance, MarkerTiming};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Pseudo-shader name for program 0 (clears and other fixed-function work)
pub const FIXED_FUNCTION_SHADER: &str = "[Fixed Function / Clear]";

/// Resolve a program id to a shader name
///
/// Unlabelled programs fall back to their numeric id.
///
/// # Example
/// ```
/// use glscope::attribution::{shader_name, FIXED_FUNCTION_SHADER};
/// use glscope::call_log::ProgramLabels;
///
/// let mut labels = ProgramLabels::new();
/// labels.insert(3, "shaders/sky.frag");
/// assert_eq!(shader_name(0, &labels), FIXED_FUNCTION_SHADER);
/// assert_eq!(shader_name(3, &labels), "shaders/sky.frag");
/// assert_eq!(shader_name(9, &labels), "9");
/// ```
pub fn shader_name(program: ProgramId, labels: &ProgramLabels) -> Cow<'_, str> {
    if program == 0 {
        return Cow::Borrowed(FIXED_FUNCTION_SHADER);
    }
    match labels.get(program) {
        Some(label) => Cow::Borrowed(label),
        None => Cow::Owned(program.to_string()),
    }
}

/// Accumulated statistics for one shader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderStat {
    /// Profiled calls issued with this shader bound
    pub draws: u64,
    /// Driver-reported GPU time (ns)
    pub gpu_time: u64,
    /// Own-timer durations of markers credited to this shader (ns)
    pub app_timer: u64,
    /// Markers already credited to `app_timer`
    pub seen_markers: HashSet<MarkerId>,
}

/// Per-shader statistics in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ShaderStats {
    index: HashMap<String, usize>,
    entries: Vec<(String, ShaderStat)>,
}

impl ShaderStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ShaderStat> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Stat for `name`, created on first use
    pub fn entry_mut(&mut self, name: &str) -> &mut ShaderStat {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.entries.push((name.to_string(), ShaderStat::default()));
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShaderStat)> {
        self.entries.iter().map(|(name, stat)| (name.as_str(), stat))
    }
}

/// Row counters for one profiling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    /// Rows attributed to a shader
    pub attributed: u64,
    /// Tagged rows dropped as short or malformed
    pub skipped: u64,
}

/// Streaming attribution over one profiling pass
pub struct AttributionEngine<'a, P> {
    labels: &'a ProgramLabels,
    markers: &'a mut [MarkerInstance],
    stats: &'a mut ShaderStats,
    policy: P,
    rows: RowCounts,
}

impl<'a, P: AppTimerPolicy> AttributionEngine<'a, P> {
    pub fn new(
        labels: &'a ProgramLabels,
        markers: &'a mut [MarkerInstance],
        stats: &'a mut ShaderStats,
        policy: P,
    ) -> Self {
        Self {
            labels,
            markers,
            stats,
            policy,
            rows: RowCounts::default(),
        }
    }

    /// Attribute one profiled call
    pub fn observe(&mut self, sample: ProfileSample) {
        let labels = self.labels;
        let name = shader_name(sample.program, labels);
        let gpu = sample.gpu_duration_ns;

        let stat = self.stats.entry_mut(&name);
        stat.draws += 1;
        stat.gpu_time = stat.gpu_time.saturating_add(gpu);
        self.rows.attributed += 1;

        let Some(i) = locate_index(sample.call, self.markers) else {
            return;
        };
        let marker = &mut self.markers[i];
        marker.calls += 1;
        marker.gpu_time = marker.gpu_time.saturating_add(gpu);

        if let MarkerTiming::Measured(duration) = marker.timing {
            if duration > 0
                && !stat.seen_markers.contains(&marker.id)
                && self.policy.attributes(&name, marker)
            {
                stat.app_timer = stat.app_timer.saturating_add(duration);
                stat.seen_markers.insert(marker.id);
            }
        }
    }

    /// Parse and attribute one profiling line; non-row lines are ignored
    pub fn observe_line(&mut self, header: &ProfileHeader, line: &str) {
        match header.parse_row(line) {
            Some(sample) => self.observe(sample),
            None if line.starts_with(super::profile::ROW_TAG) => {
                tracing::trace!(line, "skipping malformed profiling row");
                self.rows.skipped += 1;
            }
            None => {}
        }
    }

    pub fn finish(self) -> RowCounts {
        tracing::debug!(
            attributed = self.rows.attributed,
            skipped = self.rows.skipped,
            shaders = self.stats.len(),
            "profiling pass complete"
        );
        self.rows
    }
}
