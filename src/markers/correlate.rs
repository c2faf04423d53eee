// Timer correlation
//
// An application brackets a debug group with two GL_TIMESTAMP queries and reads
// both results right after the group closes. The two reads that land first in
// the window `[end, end + window]` measure the group.

use crate::call_log::{CallIndex, TimestampFetch};

/// Timestamp reads sorted ascending by call index
///
/// Sorting is stable, so reads that share a call index keep their log order.
#[derive(Debug, Clone, Default)]
pub struct SortedFetches {
    fetches: Vec<TimestampFetch>,
}

impl SortedFetches {
    pub fn new(mut fetches: Vec<TimestampFetch>) -> Self {
        fetches.sort_by_key(|f| f.call);
        Self { fetches }
    }

    pub fn len(&self) -> usize {
        self.fetches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetches.is_empty()
    }

    pub fn as_slice(&self) -> &[TimestampFetch] {
        &self.fetches
    }

    /// Reads whose call index lies in `[from, to]`
    pub fn in_range(&self, from: CallIndex, to: CallIndex) -> &[TimestampFetch] {
        let lo = self.fetches.partition_point(|f| f.call < from);
        let hi = self.fetches.partition_point(|f| f.call <= to);
        &self.fetches[lo..hi.max(lo)]
    }
}

/// Outcome of correlating one interval with the timestamp reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlation {
    /// Nanoseconds between the first and second read, zero if they run backwards
    pub duration_ns: u64,
    /// At least two reads fell inside the window
    pub valid: bool,
}

impl Correlation {
    pub const MISSING: Self = Self {
        duration_ns: 0,
        valid: false,
    };
}

/// Find the timestamp pair measuring the interval `[start, end]`
///
/// `start` does not affect the result; only the reads after `end` matter.
///
/// # Example
/// ```
/// use glscope::call_log::TimestampFetch;
/// use glscope::markers::{correlate, SortedFetches};
///
/// let fetches = SortedFetches::new(vec![
///     TimestampFetch { call: 201, value: 1_000_000_000 },
///     TimestampFetch { call: 202, value: 1_500_000_000 },
/// ]);
/// let c = correlate(100, 200, &fetches, 15);
/// assert!(c.valid);
/// assert_eq!(c.duration_ns, 500_000_000);
/// ```
pub fn correlate(
    _start: CallIndex,
    end: CallIndex,
    fetches: &SortedFetches,
    window: u64,
) -> Correlation {
    let in_window = fetches.in_range(end, end.saturating_add(window));

    match in_window {
        [first, second, ..] => Correlation {
            duration_ns: second.value.saturating_sub(first.value),
            valid: true,
        },
        _ => Correlation::MISSING,
    }
}
