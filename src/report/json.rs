//! JSON output format for analysis reports

use super::AnalysisReport;

/// Serialize a report as pretty-printed JSON
pub fn render(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
