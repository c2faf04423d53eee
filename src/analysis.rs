//! Analysis run context
//!
//! A [`TraceAnalysis`] owns all state for one run: the label table, the marker
//! instances and the per-shader statistics. Construction performs the call-log
//! pass (parse, correlate, build, reconstruct sums); attribution then streams
//! one or more profiling passes into it.
//!
//! # Example
//!
//! ```
//! use glscope::analysis::TraceAnalysis;
//! use glscope::config::AnalysisConfig;
//!
//! let dump = [
//!     r#"10 glObjectLabel(identifier = GL_PROGRAM, name = 1, length = -1, label = "shaders/test.glsl")"#,
//!     r#"20 glPushDebugGroup(source = GL_DEBUG_SOURCE_APPLICATION, id = 0, length = -1, message = "Group")"#,
//!     "30 glPopDebugGroup()",
//!     "31 glGetQueryObjectui64v(id = 1, pname = GL_QUERY_RESULT, params = &1000)",
//!     "32 glGetQueryObjectui64v(id = 2, pname = GL_QUERY_RESULT, params = &2000)",
//! ];
//! let mut analysis = TraceAnalysis::from_lines(dump, AnalysisConfig::default());
//! analysis.attribute_lines(["# no program gpu_dura", "call 25 1 5000"]).unwrap();
//!
//! let report = analysis.report(None);
//! assert_eq!(report.shaders[0].name, "shaders/test.glsl");
//! assert_eq!(report.markers[0].timer_ns, 1000);
//! ```

use crate::attribution::{
    AppTimerPolicy, AttributionEngine, LabelConventionPolicy, ProfileHeader, RowCounts,
    ShaderStats,
};
use crate::call_log::{lossy_lines, parse_call_log, read_call_log, CallLog, ProgramLabels};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::markers::{build_instances, reconstruct_sums, MarkerInstance, SortedFetches};
use crate::report::{normalize_frame_count, AnalysisReport, RunSummary};
use std::io::{self, BufRead};

/// State for one analysis run
#[derive(Debug, Clone)]
pub struct TraceAnalysis {
    config: AnalysisConfig,
    labels: ProgramLabels,
    markers: Vec<MarkerInstance>,
    shaders: ShaderStats,
    fetch_count: usize,
    unmatched_pops: usize,
    unclosed_pushes: usize,
    rows: RowCounts,
}

impl TraceAnalysis {
    /// Build marker instances from a parsed call log
    pub fn from_call_log(log: CallLog, config: AnalysisConfig) -> Self {
        let fetches = SortedFetches::new(log.fetches);
        let mut markers = build_instances(&log.intervals, &fetches, config.timer_window);
        reconstruct_sums(&mut markers);

        tracing::info!(
            shader_labels = log.labels.len(),
            debug_groups = markers.len(),
            timestamp_fetches = fetches.len(),
            "call log analysed"
        );

        Self {
            config,
            labels: log.labels,
            markers,
            shaders: ShaderStats::new(),
            fetch_count: fetches.len(),
            unmatched_pops: log.unmatched_pops,
            unclosed_pushes: log.unclosed_pushes,
            rows: RowCounts::default(),
        }
    }

    /// Run the call-log pass over in-memory lines
    pub fn from_lines<I, S>(lines: I, config: AnalysisConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_call_log(parse_call_log(lines), config)
    }

    /// Run the call-log pass over a reader, consuming it line by line
    pub fn from_reader<R: BufRead>(reader: R, config: AnalysisConfig) -> Result<Self> {
        Ok(Self::from_call_log(read_call_log(reader)?, config))
    }

    /// Attribute an in-memory profiling stream with the configured policy
    pub fn attribute_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let policy = LabelConventionPolicy::new(&self.config.attribution);
        self.attribute_with_policy(lines.into_iter().map(Ok), policy)
    }

    /// Attribute a profiling stream read line by line
    pub fn attribute_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let policy = LabelConventionPolicy::new(&self.config.attribution);
        self.attribute_with_policy(lossy_lines(reader), policy)
    }

    /// Attribute a profiling stream with an explicit app-timer policy
    ///
    /// Lines before the `#` header are skipped. A stream without a header, or
    /// a header missing a required column, is an error.
    pub fn attribute_with_policy<I, S, P>(&mut self, lines: I, policy: P) -> Result<()>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
        P: AppTimerPolicy,
    {
        let mut lines = lines.into_iter();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if ProfileHeader::is_header_line(line.as_ref()) {
                        break ProfileHeader::parse(line.as_ref(), &self.config.columns)?;
                    }
                }
                None => return Err(AnalysisError::MissingHeader),
            }
        };
        tracing::debug!(columns = header.width(), "profiling header found");

        let mut engine =
            AttributionEngine::new(&self.labels, &mut self.markers, &mut self.shaders, policy);
        for line in lines {
            engine.observe_line(&header, line?.as_ref());
        }
        let rows = engine.finish();

        self.rows.attributed += rows.attributed;
        self.rows.skipped += rows.skipped;
        Ok(())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn labels(&self) -> &ProgramLabels {
        &self.labels
    }

    pub fn markers(&self) -> &[MarkerInstance] {
        &self.markers
    }

    pub fn shader_stats(&self) -> &ShaderStats {
        &self.shaders
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            shader_labels: self.labels.len(),
            marker_instances: self.markers.len(),
            timestamp_fetches: self.fetch_count,
            unmatched_pops: self.unmatched_pops,
            unclosed_pushes: self.unclosed_pushes,
            rows_attributed: self.rows.attributed,
            rows_skipped: self.rows.skipped,
        }
    }

    /// Sorted per-shader and per-instance reports
    pub fn report(&self, frames: Option<i64>) -> AnalysisReport {
        AnalysisReport::new(
            &self.shaders,
            &self.markers,
            self.summary(),
            normalize_frame_count(frames),
        )
    }
}
