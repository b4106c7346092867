//! Core module - period model, time scoping and the autonomy analyzers

mod metrics;
mod overlap;
mod scope;
mod types;

pub(crate) use metrics::calculate_metrics;
pub(crate) use overlap::calculate_overlap_metrics;
pub(crate) use scope::{TimeScope, parse_timestamp};
pub(crate) use types::{
    AutonomyData, AutonomyMetrics, AutonomyPeriod, ExtractedPrompt, OverlapMetrics,
};
