//! Session discovery
//!
//! Layout: <root>/<project>/sessions/<session_id>/events.jsonl

use std::env;
use std::path::{Path, PathBuf};

use crate::consts::{EVENTS_FILE, SESSIONS_SUBDIR};
use crate::source::{SessionFilter, SessionUnit};

const DEFAULT_HOME_DIR: &str = ".amplifier";
const HOME_ENV: &str = "AMPLIFIER_HOME";
const PROJECTS_SUBDIR: &str = "projects";

/// Sub-session ids carry "_<delegate-name>"; root ids are plain UUIDs.
pub(crate) fn is_sub_session(session_id: &str) -> bool {
    session_id.contains('_')
}

/// Resolve the projects root: explicit path, then $AMPLIFIER_HOME/projects,
/// then ~/.amplifier/projects.
pub(crate) fn resolve_projects_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(home) = env::var(HOME_ENV)
        && !home.trim().is_empty()
    {
        return Some(PathBuf::from(home).join(PROJECTS_SUBDIR));
    }
    let home = dirs::home_dir()?;
    Some(home.join(DEFAULT_HOME_DIR).join(PROJECTS_SUBDIR))
}

fn project_excluded(project: &str, patterns: &[String]) -> bool {
    let project = project.to_lowercase();
    patterns
        .iter()
        .map(|p| p.trim().to_lowercase())
        .any(|p| !p.is_empty() && project.contains(&p))
}

fn unit_from_events_path(events_path: PathBuf) -> Option<SessionUnit> {
    let session_dir = events_path.parent()?;
    let session_id = session_dir.file_name()?.to_str()?.to_string();
    let project = session_dir
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .and_then(|s| s.to_str())?
        .to_string();
    Some(SessionUnit {
        session_id,
        project,
        events_path,
    })
}

/// Find every session unit under `root` that passes `filter`, sorted by path.
/// A missing root yields no sessions.
pub(crate) fn discover_sessions(root: &Path, filter: &SessionFilter) -> Vec<SessionUnit> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "projects directory not found");
        return Vec::new();
    }

    let pattern = format!(
        "{}/*/{}/*/{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        SESSIONS_SUBDIR,
        EVENTS_FILE
    );

    let mut paths: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().filter(|p| p.is_file()).collect(),
        Err(err) => {
            tracing::warn!(%pattern, %err, "invalid session glob");
            return Vec::new();
        }
    };
    paths.sort();

    paths
        .into_iter()
        .filter_map(unit_from_events_path)
        .filter(|unit| filter.include_sub_sessions || unit.is_root())
        .filter(|unit| !project_excluded(&unit.project, &filter.exclude_projects))
        .collect()
}
