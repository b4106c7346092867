//! Autonomy duration statistics

use std::collections::HashSet;

use crate::core::types::{AutonomyMetrics, AutonomyPeriod};

const ONE_MINUTE: f64 = 60.0;
const FIVE_MINUTES: f64 = 300.0;
const FIFTEEN_MINUTES: f64 = 900.0;

/// Aggregate statistics over periods. None when there is nothing to describe.
pub(crate) fn calculate_metrics(
    periods: &[AutonomyPeriod],
    total_prompts_sent: usize,
) -> Option<AutonomyMetrics> {
    if periods.is_empty() {
        return None;
    }

    let mut durations: Vec<f64> = periods
        .iter()
        .map(AutonomyPeriod::duration_seconds)
        .collect();
    let count = durations.len();
    let total: f64 = durations.iter().sum();
    let mean = total / count as f64;

    let unique_sessions = periods
        .iter()
        .map(|p| p.session_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let stdev = (count >= 2).then(|| {
        let variance =
            durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    let under_1min = durations.iter().filter(|d| **d < ONE_MINUTE).count();
    let between_1_5min = durations
        .iter()
        .filter(|d| (ONE_MINUTE..FIVE_MINUTES).contains(*d))
        .count();
    let between_5_15min = durations
        .iter()
        .filter(|d| (FIVE_MINUTES..FIFTEEN_MINUTES).contains(*d))
        .count();
    let over_15min = durations.iter().filter(|d| **d >= FIFTEEN_MINUTES).count();

    durations.sort_by(f64::total_cmp);
    let median = if count % 2 == 1 {
        durations[count / 2]
    } else {
        (durations[count / 2 - 1] + durations[count / 2]) / 2.0
    };
    let max = durations[count - 1];

    Some(AutonomyMetrics {
        total_prompts_sent: total_prompts_sent.max(count),
        completed_periods: count,
        total_seconds: total,
        mean_seconds: mean,
        median_seconds: median,
        max_seconds: max,
        stdev_seconds: stdev,
        under_1min,
        between_1_5min,
        between_5_15min,
        over_15min,
        unique_sessions,
    })
}
