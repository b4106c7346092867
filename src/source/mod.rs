//! Event log reader
//!
//! Discovers session logs on disk and turns their records into autonomy
//! periods and extracted prompts.

pub(crate) mod discovery;
pub(crate) mod loader;
pub(crate) mod parser;

use std::path::PathBuf;

/// A discovered session log
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionUnit {
    pub(crate) session_id: String,
    /// Project directory name the session is grouped under
    pub(crate) project: String,
    pub(crate) events_path: PathBuf,
}

impl SessionUnit {
    pub(crate) fn is_root(&self) -> bool {
        !discovery::is_sub_session(&self.session_id)
    }
}

/// Which discovered sessions take part in a run
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionFilter {
    /// Case-insensitive substrings of project names to skip
    pub(crate) exclude_projects: Vec<String>,
    pub(crate) include_sub_sessions: bool,
}

pub(crate) use discovery::resolve_projects_dir;
pub(crate) use loader::{LoadResult, load_sessions};
