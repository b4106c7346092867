use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::{CategoryCombination, CategoryStats, ClassifiedPrompt, SemanticMetrics};

const TOP_COMBINATIONS: usize = 10;

/// Counts ordered by count descending, then key
fn ranked<K: Ord + Clone>(counts: &HashMap<K, usize>) -> Vec<(K, usize)> {
    let mut ranked: Vec<(K, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

fn percentage(count: usize, total: usize) -> f64 {
    100.0 * count as f64 / total as f64
}

/// Category distribution over classified prompts; `None` when there are none
pub(crate) fn calculate_semantic_metrics(prompts: &[ClassifiedPrompt]) -> Option<SemanticMetrics> {
    if prompts.is_empty() {
        return None;
    }
    let total = prompts.len();

    let mut category_counts: HashMap<String, usize> = HashMap::new();
    let mut wildcard_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut combinations: HashMap<Vec<String>, usize> = HashMap::new();
    let mut sessions: HashSet<&str> = HashSet::new();
    let mut per_session: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut multi_category_count = 0;

    for prompt in prompts {
        let labels: Vec<String> = prompt
            .categories
            .iter()
            .map(|c| c.as_str().to_string())
            .collect();

        let session = per_session.entry(prompt.session_id.clone()).or_default();
        for label in &labels {
            *category_counts.entry(label.clone()).or_default() += 1;
            *session.entry(label.clone()).or_default() += 1;
        }
        sessions.insert(&prompt.session_id);

        if let Some(wildcard) = &prompt.wildcard {
            *wildcard_counts.entry(wildcard.clone()).or_default() += 1;
        }
        if labels.len() > 1 {
            multi_category_count += 1;
        }

        let mut combo = labels;
        combo.sort();
        *combinations.entry(combo).or_default() += 1;
    }

    let category_stats = ranked(&category_counts)
        .into_iter()
        .map(|(category, count)| CategoryStats {
            category,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    let common_combinations = ranked(&combinations)
        .into_iter()
        .take(TOP_COMBINATIONS)
        .map(|(categories, count)| CategoryCombination { categories, count })
        .collect();

    Some(SemanticMetrics {
        total_prompts: total,
        category_counts: category_counts.into_iter().collect(),
        category_stats,
        wildcard_categories: wildcard_counts,
        multi_category_count,
        multi_category_percentage: percentage(multi_category_count, total),
        common_combinations,
        unique_sessions: sessions.len(),
        categories_per_session: per_session,
    })
}
