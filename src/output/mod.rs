mod format;
mod json;
mod table;

use crate::core::{AutonomyMetrics, OverlapMetrics, TimeScope};
use crate::semantic::SemanticMetrics;

/// Everything one run reports
#[derive(Debug)]
pub(crate) struct Report<'a> {
    pub(crate) scope_expr: &'a str,
    pub(crate) scope: &'a TimeScope,
    pub(crate) sessions_scanned: usize,
    pub(crate) total_prompts_sent: usize,
    pub(crate) autonomy: Option<&'a AutonomyMetrics>,
    pub(crate) overlap: OverlapMetrics,
    /// Whether prompt classification was part of the run
    pub(crate) semantic_requested: bool,
    pub(crate) semantic: Option<&'a SemanticMetrics>,
    pub(crate) elapsed_ms: f64,
}

pub(crate) use json::output_json;
pub(crate) use table::print_summary;
