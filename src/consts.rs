/// Date format accepted in time scope expressions: "2026/01/12"
pub(crate) const SCOPE_DATE_FORMAT: &str = "%Y/%m/%d";

/// Keyword selecting the last completed week
pub(crate) const DEFAULT_SCOPE: &str = "default";

pub(crate) const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Event log file inside each session directory
pub(crate) const EVENTS_FILE: &str = "events.jsonl";
pub(crate) const SESSIONS_SUBDIR: &str = "sessions";

pub(crate) const SUBMIT_EVENT: &str = "prompt:submit";
pub(crate) const COMPLETE_EVENT: &str = "prompt:complete";

/// Prompts per classification request
pub(crate) const SEMANTIC_BATCH_SIZE: usize = 20;
/// Neighboring prompts attached on each side as context
pub(crate) const SEMANTIC_CONTEXT_WINDOW: usize = 2;
/// Classification requests in flight at once
pub(crate) const SEMANTIC_MAX_CONCURRENCY: usize = 3;

pub(crate) const FEATURE_SEMANTIC: &str = "semantic_categories";
pub(crate) const AVAILABLE_FEATURES: &[&str] = &[FEATURE_SEMANTIC];
