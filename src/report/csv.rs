//! CSV output format for analysis reports
//!
//! Emits the shader table, a blank line, then the debug-group table, each with
//! its own header row. Times are integer nanoseconds.

use super::{AnalysisReport, MarkerRow, ShaderRow};

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn shader_line(row: &ShaderRow) -> String {
    [
        escape_field(&row.name),
        row.draws.to_string(),
        row.gpu_time_ns.to_string(),
        row.app_timer_ns.to_string(),
    ]
    .join(",")
}

fn marker_line(row: &MarkerRow) -> String {
    [
        row.id.to_string(),
        escape_field(&row.label),
        row.start.to_string(),
        row.end.to_string(),
        row.calls.to_string(),
        row.gpu_time_ns.to_string(),
        row.timer_ns.to_string(),
        row.has_own_timer.to_string(),
        row.is_sum.to_string(),
    ]
    .join(",")
}

/// Generate CSV output as string
pub fn render(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("shader,draws,gpu_time_ns,app_timer_ns\n");
    for row in &report.shaders {
        output.push_str(&shader_line(row));
        output.push('\n');
    }

    output.push('\n');
    output.push_str("id,debug_group,start,end,calls,gpu_time_ns,timer_ns,own_timer,is_sum\n");
    for row in &report.markers {
        output.push_str(&marker_line(row));
        output.push('\n');
    }

    output
}
