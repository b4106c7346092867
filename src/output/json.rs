use serde::Serialize;

use super::Report;
use crate::core::{AutonomyMetrics, OverlapMetrics};
use crate::semantic::SemanticMetrics;

#[derive(Serialize)]
struct ScopeJson<'a> {
    expression: &'a str,
    timezone: &'a str,
    start_utc: String,
    end_utc: String,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    time_scope: ScopeJson<'a>,
    sessions_scanned: usize,
    total_prompts_sent: usize,
    autonomy: Option<&'a AutonomyMetrics>,
    overlap: OverlapMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantic: Option<Option<&'a SemanticMetrics>>,
}

/// Pretty JSON document of the run's aggregate metrics
pub(crate) fn output_json(report: &Report<'_>) -> String {
    let doc = ReportJson {
        time_scope: ScopeJson {
            expression: report.scope_expr,
            timezone: report.scope.timezone().name(),
            start_utc: report.scope.start_utc().to_rfc3339(),
            end_utc: report.scope.end_utc().to_rfc3339(),
        },
        sessions_scanned: report.sessions_scanned,
        total_prompts_sent: report.total_prompts_sent,
        autonomy: report.autonomy,
        overlap: report.overlap,
        semantic: report.semantic_requested.then_some(report.semantic),
    };
    serde_json::to_string_pretty(&doc).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
