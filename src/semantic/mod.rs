//! Semantic prompt analysis: context windows, batch classification through a
//! text-generation collaborator, and category statistics.

pub(crate) mod category;
pub(crate) mod classifier;
pub(crate) mod context;
pub(crate) mod metrics;
pub(crate) mod prompt;
pub(crate) mod provider;
pub(crate) mod response;
pub(crate) mod types;

pub(crate) use category::category_description;
pub(crate) use classifier::{BatchClassifier, CancellationToken, ClassifierConfig};
pub(crate) use context::add_context_to_prompts;
pub(crate) use metrics::calculate_semantic_metrics;
pub(crate) use provider::{AnthropicProvider, ProviderSettings};
pub(crate) use types::SemanticMetrics;
