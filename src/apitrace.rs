//! apitrace process collaborator
//!
//! Runs the external `apitrace` binary and hands its stdout to the analysis as
//! a line stream, so parsing starts before the tool has finished:
//!
//! - `apitrace info TRACE` → frame count (JSON `FramesCount`)
//! - `apitrace dump --color=never TRACE` → call log
//! - `apitrace replay --pgpu TRACE` → per-call GPU profile

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Subset of `apitrace info` output
#[derive(Debug, Deserialize)]
struct TraceInfo {
    #[serde(rename = "FramesCount")]
    frames_count: Option<i64>,
}

/// Extract the frame count from `apitrace info` JSON
pub fn parse_frame_count(info_json: &str) -> Option<i64> {
    serde_json::from_str::<TraceInfo>(info_json)
        .ok()
        .and_then(|info| info.frames_count)
}

/// Handle on the apitrace executable
#[derive(Debug, Clone)]
pub struct Apitrace {
    bin: PathBuf,
}

impl Default for Apitrace {
    fn default() -> Self {
        Self::new("apitrace")
    }
}

impl Apitrace {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Frame count of a trace, or None if it cannot be determined
    ///
    /// Never fails: a missing tool, a non-zero exit or unparsable output all
    /// yield None, which the report turns into a single frame.
    pub fn frame_count(&self, trace: &Path) -> Option<i64> {
        let output = Command::new(&self.bin)
            .arg("info")
            .arg(trace)
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => {
                let frames = parse_frame_count(&String::from_utf8_lossy(&out.stdout));
                if frames.is_none() {
                    tracing::debug!("apitrace info output has no FramesCount");
                }
                frames
            }
            Ok(out) => {
                tracing::debug!(status = %out.status, "apitrace info failed");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "could not run apitrace info");
                None
            }
        }
    }

    /// Start `apitrace dump` and stream its call log
    pub fn dump(&self, trace: &Path) -> Result<ToolStream> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("dump").arg("--color=never").arg(trace);
        ToolStream::spawn("dump", cmd)
    }

    /// Start `apitrace replay --pgpu` and stream its profile
    pub fn replay_profile(&self, trace: &Path) -> Result<ToolStream> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("replay").arg("--pgpu").arg(trace);
        ToolStream::spawn("replay", cmd)
    }
}

/// A running tool whose stdout is consumed line by line
///
/// Dropped without [`ToolStream::finish`] (for example when analysis fails
/// mid-stream), the child is killed and reaped.
#[derive(Debug)]
pub struct ToolStream {
    name: &'static str,
    child: Child,
    stdout: Option<BufReader<ChildStdout>>,
    reaped: bool,
}

impl ToolStream {
    fn spawn(name: &'static str, mut cmd: Command) -> Result<Self> {
        tracing::debug!(tool = name, command = ?cmd, "spawning apitrace");
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to run apitrace {} ({:?})", name, cmd.get_program()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .with_context(|| format!("apitrace {} has no stdout", name))?;

        Ok(Self {
            name,
            child,
            stdout: Some(stdout),
            reaped: false,
        })
    }

    /// Take the stdout reader; subsequent calls return None
    pub fn take_reader(&mut self) -> Option<BufReader<ChildStdout>> {
        self.stdout.take()
    }

    /// Wait for the tool to exit
    ///
    /// A non-zero exit is logged, not returned: everything the tool printed
    /// before failing has already been analysed.
    pub fn finish(mut self) -> Result<()> {
        drop(self.stdout.take());
        let status = self
            .child
            .wait()
            .with_context(|| format!("Failed to wait for apitrace {}", self.name))?;
        self.reaped = true;
        if !status.success() {
            tracing::warn!(tool = self.name, %status, "apitrace exited unsuccessfully");
        }
        Ok(())
    }
}

impl Drop for ToolStream {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        drop(self.stdout.take());
        if let Ok(None) = self.child.try_wait() {
            tracing::debug!(tool = self.name, "killing unfinished apitrace");
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_count() {
        assert_eq!(parse_frame_count(r#"{"FramesCount": 120, "API": "GL"}"#), Some(120));
    }

    #[test]
    fn test_parse_frame_count_missing_field() {
        assert_eq!(parse_frame_count(r#"{"API": "GL"}"#), None);
    }

    #[test]
    fn test_parse_frame_count_invalid_json() {
        assert_eq!(parse_frame_count("not json"), None);
    }

    #[test]
    fn test_frame_count_missing_tool() {
        let tool = Apitrace::new("/nonexistent/apitrace-for-tests");
        assert_eq!(tool.frame_count(Path::new("x.trace")), None);
    }

    #[test]
    fn test_dump_missing_tool_errors() {
        let tool = Apitrace::new("/nonexistent/apitrace-for-tests");
        let err = tool.dump(Path::new("x.trace")).unwrap_err();
        assert!(err.to_string().contains("Failed to run apitrace dump"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_from_fake_tool() {
        use std::io::BufRead;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("apitrace");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = info ]; then echo '{\"FramesCount\": 3}'; else echo \"$1 $2\"; fi\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tool = Apitrace::new(&script);
        assert_eq!(tool.frame_count(Path::new("t.trace")), Some(3));

        let mut stream = tool.replay_profile(Path::new("t.trace")).unwrap();
        let lines: Vec<String> = stream
            .take_reader()
            .unwrap()
            .lines()
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["replay --pgpu".to_string()]);
        assert!(stream.take_reader().is_none());
        stream.finish().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_dropped_stream_kills_child() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::{Duration, Instant};

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("apitrace");
        std::fs::write(&script, "#!/bin/sh
exec sleep 30
").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let started = Instant::now();
        let stream = Apitrace::new(&script).dump(Path::new("t.trace")).unwrap();
        drop(stream);

        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
