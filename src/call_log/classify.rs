// Line classifiers for `apitrace dump --color=never` output
//
// Each classifier recognises exactly one event shape and extracts its payload.
// A line that does not match, or whose numeric fields overflow, yields None.

use regex::Regex;
use std::sync::LazyLock;

/// Call index as printed at the start of every dump line
pub type CallIndex = u64;

/// OpenGL program object name
pub type ProgramId = u32;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(\d+)\s+glObjectLabel\(identifier\s*=\s*GL_PROGRAM\s*,\s*name\s*=\s*(\d+)\s*,\s*.*label\s*=\s*"(.*)"\)"#,
    )
    .expect("program label regex")
});

static PUSH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(\d+)\s+glPushDebugGroup\(.*message\s*=\s*"(.*)"\)"#)
        .expect("push debug group regex")
});

static POP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+glPopDebugGroup\(\)").expect("pop debug group regex")
});

static RESULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(\d+)\s+glGetQueryObjectui64v\(id\s*=\s*(\d+)\s*,\s*pname\s*=\s*GL_QUERY_RESULT\s*,\s*params\s*=\s*&(\d+)\)",
    )
    .expect("query result regex")
});

/// `glObjectLabel(GL_PROGRAM, ...)`: a human-readable name for a program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLabel {
    pub call: CallIndex,
    pub program: ProgramId,
    pub label: String,
}

/// `glPushDebugGroup(...)`: opens a debug group region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugGroupPush {
    pub call: CallIndex,
    pub label: String,
}

/// `glGetQueryObjectui64v(..., GL_QUERY_RESULT, ...)`: a GPU timestamp read back by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFetch {
    pub call: CallIndex,
    /// Timestamp in nanoseconds
    pub value: u64,
}

/// Recognise a program label assignment
///
/// # Example
/// ```
/// use glscope::call_log::parse_program_label;
///
/// let line = r#"1234 glObjectLabel(identifier = GL_PROGRAM, name = 42, length = -1, label = "shaders/pbr.frag")"#;
/// let label = parse_program_label(line).unwrap();
/// assert_eq!(label.program, 42);
/// assert_eq!(label.label, "shaders/pbr.frag");
/// ```
pub fn parse_program_label(line: &str) -> Option<ProgramLabel> {
    let caps = LABEL_RE.captures(line)?;
    Some(ProgramLabel {
        call: caps[1].parse().ok()?,
        program: caps[2].parse().ok()?,
        label: caps[3].to_string(),
    })
}

/// Recognise the opening of a debug group
pub fn parse_push(line: &str) -> Option<DebugGroupPush> {
    let caps = PUSH_RE.captures(line)?;
    Some(DebugGroupPush {
        call: caps[1].parse().ok()?,
        label: caps[2].to_string(),
    })
}

/// Recognise the closing of a debug group, returning its call index
pub fn parse_pop(line: &str) -> Option<CallIndex> {
    POP_RE.captures(line)?[1].parse().ok()
}

/// Recognise a 64-bit query result read
///
/// The query id is not needed for correlation and is dropped.
pub fn parse_timestamp_fetch(line: &str) -> Option<TimestampFetch> {
    let caps = RESULT_RE.captures(line)?;
    Some(TimestampFetch {
        call: caps[1].parse().ok()?,
        value: caps[3].parse().ok()?,
    })
}
