use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::category::PromptCategory;
use crate::core::ExtractedPrompt;

/// A prompt plus its same-session neighbors
#[derive(Debug, Clone)]
pub(crate) struct PromptWithContext {
    pub(crate) prompt: ExtractedPrompt,
    pub(crate) context_before: Vec<String>,
    pub(crate) context_after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassifiedPrompt {
    pub(crate) text: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) session_id: String,
    /// 1 to 3 labels, never empty
    pub(crate) categories: Vec<PromptCategory>,
    pub(crate) context_before: Vec<String>,
    pub(crate) context_after: Vec<String>,
    /// Only set when `categories` contains `Other`
    pub(crate) wildcard: Option<String>,
}

impl ClassifiedPrompt {
    pub(crate) fn from_context(
        item: &PromptWithContext,
        categories: Vec<PromptCategory>,
        wildcard: Option<String>,
    ) -> Self {
        Self {
            text: item.prompt.text.clone(),
            timestamp: item.prompt.timestamp,
            session_id: item.prompt.session_id.clone(),
            categories,
            context_before: item.context_before.clone(),
            context_after: item.context_after.clone(),
            wildcard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryStats {
    pub(crate) category: String,
    pub(crate) count: usize,
    pub(crate) percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryCombination {
    /// Sorted labels
    pub(crate) categories: Vec<String>,
    pub(crate) count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SemanticMetrics {
    pub(crate) total_prompts: usize,
    pub(crate) category_counts: BTreeMap<String, usize>,
    /// Sorted by count descending, then label
    pub(crate) category_stats: Vec<CategoryStats>,
    pub(crate) wildcard_categories: BTreeMap<String, usize>,
    pub(crate) multi_category_count: usize,
    pub(crate) multi_category_percentage: f64,
    /// Top 10
    pub(crate) common_combinations: Vec<CategoryCombination>,
    pub(crate) unique_sessions: usize,
    pub(crate) categories_per_session: BTreeMap<String, BTreeMap<String, usize>>,
}
