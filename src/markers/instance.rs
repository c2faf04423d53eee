// Marker instances: debug-group intervals enriched with timing and accumulators

use super::correlate::{correlate, SortedFetches};
use crate::call_log::{CallIndex, DebugGroupInterval};

/// Stable identity of a marker instance within one run
pub type MarkerId = usize;

/// Where a marker's duration comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTiming {
    /// The group has its own timestamp pair (duration may be zero after clamping)
    Measured(u64),
    /// No own timer; sum of the direct timed children (always positive)
    Summed(u64),
    /// No own timer and nothing to sum
    Unmeasured,
}

impl MarkerTiming {
    pub fn duration_ns(self) -> u64 {
        match self {
            MarkerTiming::Measured(ns) | MarkerTiming::Summed(ns) => ns,
            MarkerTiming::Unmeasured => 0,
        }
    }
}

/// One occurrence of a debug group in the trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInstance {
    pub id: MarkerId,
    pub start: CallIndex,
    pub end: CallIndex,
    pub label: String,
    pub timing: MarkerTiming,
    /// Profiled calls attributed to this instance
    pub calls: u64,
    /// Sum of driver-reported GPU time for those calls (ns)
    pub gpu_time: u64,
}

impl MarkerInstance {
    pub fn new(
        id: MarkerId,
        start: CallIndex,
        end: CallIndex,
        label: impl Into<String>,
        timing: MarkerTiming,
    ) -> Self {
        Self {
            id,
            start,
            end,
            label: label.into(),
            timing,
            calls: 0,
            gpu_time: 0,
        }
    }

    pub fn range(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn duration_ns(&self) -> u64 {
        self.timing.duration_ns()
    }

    pub fn has_own_timer(&self) -> bool {
        matches!(self.timing, MarkerTiming::Measured(_))
    }

    pub fn is_sum(&self) -> bool {
        matches!(self.timing, MarkerTiming::Summed(_))
    }

    /// Inclusive containment of a call index
    pub fn contains_call(&self, call: CallIndex) -> bool {
        self.start <= call && call <= self.end
    }

    /// `other` lies strictly inside `self` (both bounds strict)
    pub fn strictly_contains(&self, other: &MarkerInstance) -> bool {
        self.start < other.start && other.end < self.end
    }
}

/// Materialise marker instances in interval encounter order
///
/// Ids are assigned sequentially from zero. Accumulators start at zero.
pub fn build_instances(
    intervals: &[DebugGroupInterval],
    fetches: &SortedFetches,
    window: u64,
) -> Vec<MarkerInstance> {
    intervals
        .iter()
        .enumerate()
        .map(|(id, interval)| {
            let correlation = correlate(interval.start, interval.end, fetches, window);
            let timing = if correlation.valid {
                MarkerTiming::Measured(correlation.duration_ns)
            } else {
                tracing::trace!(
                    label = %interval.label,
                    start = interval.start,
                    end = interval.end,
                    "no timestamp pair after debug group"
                );
                MarkerTiming::Unmeasured
            };
            MarkerInstance::new(id, interval.start, interval.end, &interval.label, timing)
        })
        .collect()
}
