// Profiling stream parsing for `apitrace replay --pgpu`
//
// The replay prints a `#`-prefixed header naming its columns, then one
// `call ...` row per profiled call. Column order is taken from the header.

use crate::call_log::{CallIndex, ProgramId};
use crate::config::ProfileColumns;
use crate::error::{AnalysisError, Result};

/// Literal tag that starts every profiled-call row
pub const ROW_TAG: &str = "call ";

/// One profiled call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSample {
    pub call: CallIndex,
    /// Driver-reported GPU time for this call (ns)
    pub gpu_duration_ns: u64,
    pub program: ProgramId,
}

/// Column positions resolved from the profiling header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeader {
    call: usize,
    gpu_duration: usize,
    program: usize,
    width: usize,
}

impl ProfileHeader {
    /// Is this line the header? apitrace marks it with a leading `#`.
    pub fn is_header_line(line: &str) -> bool {
        line.starts_with('#')
    }

    /// Resolve required column positions from a header line
    ///
    /// The leading `#` may stand alone (`# no gpu_dura`) or be glued to the
    /// first name (`#no gpu_dura`). When a name repeats, the last one wins.
    ///
    /// # Example
    /// ```
    /// use glscope::attribution::ProfileHeader;
    /// use glscope::config::ProfileColumns;
    ///
    /// let header = ProfileHeader::parse("# no program gpu_dura", &ProfileColumns::default()).unwrap();
    /// let sample = header.parse_row("call 25 1 5000").unwrap();
    /// assert_eq!(sample.program, 1);
    /// assert_eq!(sample.gpu_duration_ns, 5000);
    /// ```
    pub fn parse(line: &str, columns: &ProfileColumns) -> Result<Self> {
        let body = line
            .trim_end_matches(['\r', '\n'])
            .strip_prefix('#')
            .ok_or(AnalysisError::MissingHeader)?;
        let fields: Vec<&str> = body.split_whitespace().collect();
        Self::from_fields(&fields, columns)
    }

    /// Resolve required column positions from already-split field names
    pub fn from_fields(fields: &[&str], columns: &ProfileColumns) -> Result<Self> {
        let position = |name: &str| {
            fields
                .iter()
                .rposition(|f| *f == name)
                .ok_or_else(|| AnalysisError::MissingColumn {
                    column: name.to_string(),
                    found: fields.join(" "),
                })
        };

        Ok(Self {
            call: position(&columns.call)?,
            gpu_duration: position(&columns.gpu_duration)?,
            program: position(&columns.program)?,
            width: fields.len(),
        })
    }

    /// Number of columns declared by the header
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extract a sample from a data row
    ///
    /// Returns None for non-row lines, rows shorter than the header, and rows
    /// whose required fields are not integers. A negative GPU duration is
    /// clamped to zero; the call still counts.
    pub fn parse_row(&self, line: &str) -> Option<ProfileSample> {
        let rest = line.strip_prefix(ROW_TAG)?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        if parts.len() < self.width {
            return None;
        }

        let gpu_duration: i64 = parts[self.gpu_duration].parse().ok()?;

        Some(ProfileSample {
            call: parts[self.call].parse().ok()?,
            gpu_duration_ns: gpu_duration.max(0) as u64,
            program: parts[self.program].parse().ok()?,
        })
    }
}
