//! Console tables
//!
//! Two boxed tables: shaders by cumulative GPU time, then debug-group
//! instances in call order. Times are shown in milliseconds.

use super::{ns_to_ms, AnalysisReport, MarkerRow, ShaderRow};
use std::fmt::Write;

const SHADER_TITLE: &str = "Shader Name";
const MAX_SHADER_WIDTH: usize = 80;
const GROUP_WIDTH: usize = 40;

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    line
}

fn truncate(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Render the per-shader table
pub fn shader_table(rows: &[ShaderRow], frame_count: u64) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once(SHADER_TITLE.len() + 4))
        .max()
        .unwrap_or(0)
        .min(MAX_SHADER_WIDTH);
    let sep = separator(&[name_width, 7, 10, 10, 10]);

    let mut out = String::new();
    let _ = writeln!(out, "\n=== Performance by Shader (Cumulative) ===");
    let _ = writeln!(out, "{}", sep);
    let _ = writeln!(
        out,
        "| {:<nw$} | {:>7} | {:>10} | {:>10} | {:>10} |",
        SHADER_TITLE,
        "Calls",
        "GPU[ms]",
        "Avg/Fr[ms]",
        "Timer[ms]",
        nw = name_width
    );
    let _ = writeln!(out, "{}", sep);

    for row in rows {
        let app_ms = ns_to_ms(row.app_timer_ns);
        let timer = if app_ms > 0.0 {
            format!("{:.1}", app_ms)
        } else {
            "N/A".to_string()
        };
        let _ = writeln!(
            out,
            "| {:<nw$} | {:>7} | {:>10} | {:>10} | {:>10} |",
            truncate(&row.name, name_width),
            row.draws,
            format!("{:.2}", ns_to_ms(row.gpu_time_ns)),
            format!("{:.4}", row.gpu_per_frame_ms(frame_count)),
            timer,
            nw = name_width
        );
    }
    let _ = writeln!(out, "{}", sep);
    out
}

/// Render the per-instance debug-group table
///
/// Summed timers carry a `*` suffix.
pub fn instance_table(rows: &[MarkerRow]) -> String {
    let sep = separator(&[GROUP_WIDTH, 12, 7, 10, 11]);

    let mut out = String::new();
    let _ = writeln!(out, "\n=== Debug Groups (Per Instance) ===");
    let _ = writeln!(out, "{}", sep);
    let _ = writeln!(
        out,
        "| {:<40} | {:>12} | {:>7} | {:>10} | {:>11} |",
        "Debug Group", "Call Range", "Calls", "GPU[ms]", "Timer[ms]"
    );
    let _ = writeln!(out, "{}", sep);

    for row in rows {
        let timer_ms = ns_to_ms(row.timer_ns);
        let timer = if timer_ms > 0.0 {
            let suffix = if row.is_sum { "*" } else { "" };
            format!("{:.1}{}", timer_ms, suffix)
        } else {
            "N/A".to_string()
        };
        let _ = writeln!(
            out,
            "| {:<40} | {:>12} | {:>7} | {:>10} | {:>11} |",
            truncate(&row.label, GROUP_WIDTH),
            format!("{}-{}", row.start, row.end),
            row.calls,
            format!("{:.2}", ns_to_ms(row.gpu_time_ns)),
            timer
        );
    }
    let _ = writeln!(out, "{}", sep);
    out
}

/// Render the full text report: both tables and the legend
pub fn render(report: &AnalysisReport) -> String {
    let mut out = shader_table(&report.shaders, report.frame_count);
    out.push_str(&instance_table(&report.markers));
    let _ = writeln!(out, "\n[!] Total Frames: {}", report.frame_count);
    let _ = writeln!(
        out,
        "[!] Timer [ms] = Manual GL_TIMESTAMP from glGetQueryObjectui64v pairs."
    );
    let _ = writeln!(
        out,
        "[!] GPU [ms]   = Driver auto-profiling (accurate for Fragment/Vertex shaders)."
    );
    let _ = writeln!(out, "[!] * = Sum of nested timers (group has no own timer).");
    out
}
