// Single-pass parser for the call log
//
// Debug groups are matched with an explicit LIFO stack keyed only by nesting
// order; labels play no part in matching. Intervals are emitted when their pop
// is seen, so the output is ordered by end call, not by start call.

use super::classify::{
    parse_pop, parse_program_label, parse_push, parse_timestamp_fetch, CallIndex,
    DebugGroupPush, ProgramId, TimestampFetch,
};
use crate::error::Result;
use std::collections::HashMap;
use std::io::{self, BufRead};

/// Program id → label, last assignment wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramLabels {
    labels: HashMap<ProgramId, String>,
}

impl ProgramLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label, replacing any earlier label for the same program
    pub fn insert(&mut self, program: ProgramId, label: impl Into<String>) {
        self.labels.insert(program, label.into());
    }

    pub fn get(&self, program: ProgramId) -> Option<&str> {
        self.labels.get(&program).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl FromIterator<(ProgramId, String)> for ProgramLabels {
    fn from_iter<T: IntoIterator<Item = (ProgramId, String)>>(iter: T) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

/// A matched push/pop pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugGroupInterval {
    pub start: CallIndex,
    pub end: CallIndex,
    pub label: String,
}

impl DebugGroupInterval {
    pub fn new(start: CallIndex, end: CallIndex, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

/// Everything the core needs from one call log
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub labels: ProgramLabels,
    /// Intervals in the order their closing pop was encountered
    pub intervals: Vec<DebugGroupInterval>,
    /// Timestamp reads in log order (not necessarily sorted)
    pub fetches: Vec<TimestampFetch>,
    /// Pops seen while no push was open
    pub unmatched_pops: usize,
    /// Pushes still open when the log ended
    pub unclosed_pushes: usize,
}

/// Incremental call-log parser
///
/// Feed lines as they arrive; call [`CallLogParser::finish`] once the stream ends.
#[derive(Debug, Default)]
pub struct CallLogParser {
    log: CallLog,
    stack: Vec<DebugGroupPush>,
}

impl CallLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one line and fold it into the parse state
    pub fn feed(&mut self, line: &str) {
        if let Some(label) = parse_program_label(line) {
            self.log.labels.insert(label.program, label.label);
        } else if let Some(push) = parse_push(line) {
            self.stack.push(push);
        } else if let Some(end) = parse_pop(line) {
            match self.stack.pop() {
                Some(push) => self
                    .log
                    .intervals
                    .push(DebugGroupInterval::new(push.call, end, push.label)),
                None => {
                    tracing::trace!(call = end, "pop without matching push");
                    self.log.unmatched_pops += 1;
                }
            }
        } else if let Some(fetch) = parse_timestamp_fetch(line) {
            self.log.fetches.push(fetch);
        }
    }

    pub fn finish(mut self) -> CallLog {
        self.log.unclosed_pushes = self.stack.len();
        tracing::debug!(
            labels = self.log.labels.len(),
            intervals = self.log.intervals.len(),
            fetches = self.log.fetches.len(),
            unmatched_pops = self.log.unmatched_pops,
            unclosed_pushes = self.log.unclosed_pushes,
            "call log parsed"
        );
        self.log
    }
}

/// Parse an in-memory or lazily produced sequence of call-log lines
///
/// # Example
/// ```
/// use glscope::call_log::parse_call_log;
///
/// let log = parse_call_log([
///     r#"100 glPushDebugGroup(source = GL_DEBUG_SOURCE_APPLICATION, id = 0, length = -1, message = "Shadow")"#,
///     "200 glPopDebugGroup()",
/// ]);
/// assert_eq!(log.intervals.len(), 1);
/// assert_eq!(log.intervals[0].label, "Shadow");
/// ```
pub fn parse_call_log<I, S>(lines: I) -> CallLog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = CallLogParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}

/// Lines of a reader with invalid UTF-8 replaced by U+FFFD
///
/// Unlike [`BufRead::lines`], undecodable bytes never end the stream; only
/// real I/O errors are returned. Trailing `\n` and `\r\n` are stripped.
pub fn lossy_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<String>> {
    let mut buf = Vec::new();
    std::iter::from_fn(move || {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    })
}

/// Parse a call log from a reader, line by line
///
/// I/O failures (for example a dump process dying mid-stream) are hard errors.
/// Lines that are not valid UTF-8 are decoded lossily and classified as usual.
pub fn read_call_log<R: BufRead>(reader: R) -> Result<CallLog> {
    let mut parser = CallLogParser::new();
    for line in lossy_lines(reader) {
        parser.feed(&line?);
    }
    Ok(parser.finish())
}
