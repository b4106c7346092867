//! Event log parser
//!
//! Reads one session's events.jsonl and pairs prompt submissions with
//! completions. Malformed lines are skipped, never fatal.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::consts::{COMPLETE_EVENT, SUBMIT_EVENT};
use crate::core::{AutonomyPeriod, ExtractedPrompt, TimeScope, parse_timestamp};
use crate::source::SessionUnit;

// ============================================================================
// Internal types for JSONL parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct EventRecord {
    event: Option<String>,
    ts: Option<String>,
    data: Option<serde_json::Value>,
}

impl EventRecord {
    fn prompt_text(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .get("prompt")?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Everything one session contributes to a run
#[derive(Debug, Default)]
pub(crate) struct SessionScan {
    pub(crate) periods: Vec<AutonomyPeriod>,
    /// In-scope submits, whether or not a completion followed
    pub(crate) submits_in_scope: usize,
    pub(crate) prompts: Vec<ExtractedPrompt>,
}

/// Scan a session log. Unreadable files yield an empty scan.
pub(crate) fn scan_session(unit: &SessionUnit, scope: &TimeScope) -> SessionScan {
    let path = &unit.events_path;
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "failed to open event log");
            return SessionScan::default();
        }
    };
    scan_lines(BufReader::new(file), &unit.session_id, scope)
}

fn scan_lines<R: BufRead>(reader: R, session_id: &str, scope: &TimeScope) -> SessionScan {
    let mut submits: Vec<DateTime<Utc>> = Vec::new();
    let mut completes: Vec<DateTime<Utc>> = Vec::new();
    let mut scan = SessionScan::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::debug!(session_id, line = line_no + 1, %err, "unreadable line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let record: EventRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(session_id, line = line_no + 1, %err, "malformed record");
                continue;
            }
        };

        let Some(ts) = record.ts.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };

        let kind = record.event.as_deref();
        if kind != Some(SUBMIT_EVENT) && kind != Some(COMPLETE_EVENT) {
            continue;
        }

        let Some(timestamp) = parse_timestamp(ts) else {
            tracing::debug!(session_id, line = line_no + 1, ts, "invalid timestamp");
            continue;
        };

        if kind == Some(COMPLETE_EVENT) {
            completes.push(timestamp);
            continue;
        }

        submits.push(timestamp);
        if !scope.contains(timestamp) {
            continue;
        }
        scan.submits_in_scope += 1;
        if let Some(text) = record.prompt_text() {
            let index_in_session = scan.prompts.len();
            scan.prompts.push(ExtractedPrompt {
                text: text.to_string(),
                timestamp,
                session_id: session_id.to_string(),
                index_in_session,
            });
        }
    }

    // Strictly positional: the i-th submit closes with the i-th completion
    scan.periods = submits
        .iter()
        .zip(completes.iter())
        .filter(|(submit, _)| scope.contains(**submit))
        .map(|(submit, complete)| AutonomyPeriod::new(*submit, *complete, session_id))
        .collect();

    scan
}
