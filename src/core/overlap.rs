//! Session overlap analysis
//!
//! Sweeps start/end events of all autonomy periods to count how often a
//! session started while another session was still working.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::core::types::{AutonomyPeriod, OverlapMetrics};

/// Ends sort before starts at the same instant, so back-to-back sessions do
/// not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SweepKind {
    End,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SweepEvent<'a> {
    at: DateTime<Utc>,
    kind: SweepKind,
    session_id: &'a str,
}

/// Compute overlap metrics. The result depends only on the multiset of
/// periods, never on their order.
pub(crate) fn calculate_overlap_metrics(periods: &[AutonomyPeriod]) -> OverlapMetrics {
    let mut events: Vec<SweepEvent<'_>> = Vec::with_capacity(periods.len() * 2);
    for period in periods {
        events.push(SweepEvent {
            at: period.start,
            kind: SweepKind::Start,
            session_id: &period.session_id,
        });
        events.push(SweepEvent {
            at: period.end,
            kind: SweepKind::End,
            session_id: &period.session_id,
        });
    }
    // Field order gives (time, end-before-start, session id): a total order
    events.sort_unstable();

    let mut active: HashSet<&str> = HashSet::new();
    let mut metrics = OverlapMetrics::default();

    for event in events {
        match event.kind {
            SweepKind::Start => {
                if active.iter().any(|id| *id != event.session_id) {
                    metrics.overlap_count += 1;
                }
                active.insert(event.session_id);
                metrics.max_parallel_sessions = metrics.max_parallel_sessions.max(active.len());
            }
            SweepKind::End => {
                active.remove(event.session_id);
            }
        }
    }

    metrics
}
