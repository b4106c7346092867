//! Session loader: discover → scan → merge → sort

use std::path::Path;
use std::time::Instant;

use crate::core::{AutonomyData, ExtractedPrompt, TimeScope};
use crate::source::discovery::discover_sessions;
use crate::source::parser::scan_session;
use crate::source::{SessionFilter, SessionUnit};

/// Result of one pass over all included sessions
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) autonomy: AutonomyData,
    /// Sorted ascending by timestamp
    pub(crate) prompts: Vec<ExtractedPrompt>,
    pub(crate) sessions_scanned: usize,
    pub(crate) elapsed_ms: f64,
}

struct SessionLoader<'a> {
    scope: &'a TimeScope,
    quiet: bool,
}

impl<'a> SessionLoader<'a> {
    fn new(scope: &'a TimeScope, quiet: bool) -> Self {
        Self { scope, quiet }
    }

    fn load_units(&self, units: &[SessionUnit]) -> LoadResult {
        let start = Instant::now();
        let mut result = LoadResult::default();

        for unit in units {
            let scan = scan_session(unit, self.scope);
            result.autonomy.total_prompts_sent += scan.submits_in_scope;
            result.autonomy.periods.extend(scan.periods);
            result.prompts.extend(scan.prompts);
        }

        // Stable sorts: ties keep discovery order
        result.autonomy.periods.sort_by_key(|p| p.start);
        result.prompts.sort_by_key(|p| p.timestamp);
        result.sessions_scanned = units.len();
        result.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        result
    }

    fn load(&self, root: &Path, filter: &SessionFilter) -> LoadResult {
        let discovery_start = Instant::now();
        let units = discover_sessions(root, filter);
        let discovery_ms = discovery_start.elapsed().as_secs_f64() * 1000.0;

        if !self.quiet {
            eprintln!(
                "Scanning {} sessions in {}... ({:.2}ms)",
                units.len(),
                root.display(),
                discovery_ms
            );
        }

        let result = self.load_units(&units);

        if !self.quiet {
            eprintln!(
                "Found {} prompts, {} completed periods ({:.2}ms)",
                result.autonomy.total_prompts_sent,
                result.autonomy.periods.len(),
                result.elapsed_ms
            );
        }
        result
    }
}

/// Load periods and prompts from every included session under `root`
pub(crate) fn load_sessions(
    root: &Path,
    filter: &SessionFilter,
    scope: &TimeScope,
    quiet: bool,
) -> LoadResult {
    SessionLoader::new(scope, quiet).load(root, filter)
}
