//! Core data types shared by the reader, the analyzers and the classifier

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// One stretch of unsupervised agent work: user submit to agent completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AutonomyPeriod {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
    pub(crate) session_id: String,
}

impl AutonomyPeriod {
    pub(crate) fn new(start: DateTime<Utc>, end: DateTime<Utc>, session_id: &str) -> Self {
        Self {
            start,
            end,
            session_id: session_id.to_string(),
        }
    }

    pub(crate) fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in seconds with microsecond precision
    pub(crate) fn duration_seconds(&self) -> f64 {
        let micros = self.duration().num_microseconds().unwrap_or(i64::MAX);
        micros as f64 / 1_000_000.0
    }
}

/// A user prompt pulled from a session log, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractedPrompt {
    pub(crate) text: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) session_id: String,
    /// 0-based order of appearance within its session
    pub(crate) index_in_session: usize,
}

/// Periods and the submit tally for one scope
#[derive(Debug, Default, Clone)]
pub(crate) struct AutonomyData {
    /// Sorted ascending by start
    pub(crate) periods: Vec<AutonomyPeriod>,
    /// Every in-scope submit, paired or not. Always >= periods.len()
    pub(crate) total_prompts_sent: usize,
}

/// Concurrency across sessions
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct OverlapMetrics {
    /// Session starts that happened while another session was active
    pub(crate) overlap_count: usize,
    pub(crate) max_parallel_sessions: usize,
}

/// Descriptive statistics over autonomy periods (all durations in seconds)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AutonomyMetrics {
    pub(crate) total_prompts_sent: usize,
    pub(crate) completed_periods: usize,
    pub(crate) total_seconds: f64,
    pub(crate) mean_seconds: f64,
    pub(crate) median_seconds: f64,
    pub(crate) max_seconds: f64,
    /// None with fewer than two periods
    pub(crate) stdev_seconds: Option<f64>,
    pub(crate) under_1min: usize,
    pub(crate) between_1_5min: usize,
    pub(crate) between_5_15min: usize,
    pub(crate) over_15min: usize,
    pub(crate) unique_sessions: usize,
}
