//! Parsing and validating the classifier's JSON array reply

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use super::category::PromptCategory;
use super::types::{ClassifiedPrompt, PromptWithContext};

/// Wildcard label for every member of a group whose reply was unusable
pub(crate) const PARSE_ERROR_LABEL: &str = "parse_error";
/// Wildcard label for a member the reply had no entry for
pub(crate) const MISSING_RESULT_LABEL: &str = "missing_result";

const MAX_LABELS: usize = 3;

static FENCED_ARRAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").unwrap());

/// One entry of the reply array, leniently read
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawClassification {
    pub(crate) index: Option<i64>,
    pub(crate) categories: Vec<String>,
    pub(crate) custom_category: Option<String>,
}

impl RawClassification {
    fn fallback(index: Option<i64>, marker: &str) -> Self {
        Self {
            index,
            categories: vec![PromptCategory::Other.as_str().to_string()],
            custom_category: Some(marker.to_string()),
        }
    }

    fn from_value(value: &Value) -> Self {
        let categories = match value.get("categories").and_then(Value::as_array) {
            Some(labels) => labels
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => vec![PromptCategory::Other.as_str().to_string()],
        };
        Self {
            index: value.get("index").and_then(index_value),
            categories,
            custom_category: value
                .get("custom_category")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Integer index, also accepting integral floats such as `2.0`
fn index_value(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Fenced ```json block first, then first `[` to last `]`, else the whole text
fn extract_json_array(text: &str) -> &str {
    if let Some(caps) = FENCED_ARRAY_REGEX.captures(text)
        && let Some(array) = caps.get(1)
    {
        return array.as_str();
    }
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn try_parse_array(response: &str) -> Result<Vec<RawClassification>, String> {
    let candidate = extract_json_array(response.trim());
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Array(items)) => Ok(items.iter().map(RawClassification::from_value).collect()),
        Ok(other) => Err(format!("expected a JSON array, got {}", json_kind(&other))),
        Err(err) => Err(err.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Entries for a group of `expected` prompts. An unusable reply degrades
/// to `other` + `parse_error` for every member.
pub(crate) fn parse_batch_response(response: &str, expected: usize) -> Vec<RawClassification> {
    match try_parse_array(response) {
        Ok(entries) => entries,
        Err(reason) => {
            tracing::warn!(%reason, prompts = expected, "unparseable classification reply");
            parse_error_entries(expected)
        }
    }
}

pub(crate) fn parse_error_entries(expected: usize) -> Vec<RawClassification> {
    (1..=expected as i64)
        .map(|i| RawClassification::fallback(Some(i), PARSE_ERROR_LABEL))
        .collect()
}

/// Normalize returned labels against the taxonomy. Never empty, at most three
/// considered; a wildcard survives only next to `Other`.
pub(crate) fn validate_categories(
    labels: &[String],
    custom_category: Option<&str>,
) -> (Vec<PromptCategory>, Option<String>) {
    let mut validated: Vec<PromptCategory> = Vec::new();
    let mut wildcard = custom_category
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    for raw in labels.iter().take(MAX_LABELS) {
        let label = raw.trim().to_lowercase();
        let category = PromptCategory::from_label(&label);
        let known = category != PromptCategory::Other || label == PromptCategory::Other.as_str();
        if !known && wildcard.is_none() && !label.is_empty() {
            wildcard = Some(label);
        }
        // Each category at most once, `Other` included
        if !validated.contains(&category) {
            validated.push(category);
        }
    }

    if validated.is_empty() {
        validated.push(PromptCategory::Other);
    }
    let wildcard = wildcard.filter(|_| validated.contains(&PromptCategory::Other));
    (validated, wildcard)
}

/// Pair each group member with its entry: by 1-based `index`, then by
/// array position, then `missing_result`.
pub(crate) fn match_results(
    group: &[PromptWithContext],
    entries: &[RawClassification],
) -> Vec<ClassifiedPrompt> {
    let missing = RawClassification::fallback(None, MISSING_RESULT_LABEL);

    group
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let wanted = i as i64 + 1;
            let entry = entries
                .iter()
                .find(|e| e.index == Some(wanted))
                .or_else(|| entries.get(i))
                .unwrap_or(&missing);
            let (categories, wildcard) =
                validate_categories(&entry.categories, entry.custom_category.as_deref());
            ClassifiedPrompt::from_context(item, categories, wildcard)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExtractedPrompt;
    use chrono::{TimeZone, Utc};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn group(n: usize) -> Vec<PromptWithContext> {
        (0..n)
            .map(|i| PromptWithContext {
                prompt: ExtractedPrompt {
                    text: format!("prompt {i}"),
                    timestamp: Utc.with_ymd_and_hms(2026, 1, 10, 9, i as u32, 0).unwrap(),
                    session_id: "s".to_string(),
                    index_in_session: i,
                },
                context_before: Vec::new(),
                context_after: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn parses_fenced_block() {
        let reply = "Here you go:\n```json\n[{\"index\": 1, \"categories\": [\"testing\"], \"custom_category\": null}]\n```\nDone [really].";
        let entries = parse_batch_response(reply, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, Some(1));
        assert_eq!(entries[0].categories, labels(&["testing"]));
        assert_eq!(entries[0].custom_category, None);
    }

    #[test]
    fn parses_bare_array_inside_prose() {
        let reply = r#"Sure! [{"index": 2, "categories": ["review"]}] hope that helps"#;
        let entries = parse_batch_response(reply, 1);
        assert_eq!(entries[0].index, Some(2));
        assert_eq!(entries[0].categories, labels(&["review"]));
    }

    #[test]
    fn unparseable_reply_degrades_every_member() {
        let entries = parse_batch_response("I cannot classify these.", 5);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| {
            e.categories == labels(&["other"])
                && e.custom_category.as_deref() == Some(PARSE_ERROR_LABEL)
        }));
    }

    #[test]
    fn json_object_is_not_an_array() {
        let entries = parse_batch_response(r#"{"index": 1}"#, 2);
        assert_eq!(entries, parse_error_entries(2));
    }

    #[test]
    fn validation_caps_and_normalizes() {
        let (cats, wildcard) = validate_categories(
            &labels(&[" Debugging", "TESTING", "review", "question"]),
            None,
        );
        assert_eq!(
            cats,
            vec![
                PromptCategory::Debugging,
                PromptCategory::Testing,
                PromptCategory::Review
            ]
        );
        assert_eq!(wildcard, None);
    }

    #[test]
    fn unknown_label_becomes_other_with_wildcard() {
        let (cats, wildcard) = validate_categories(&labels(&["Planning", "debugging"]), None);
        assert_eq!(cats, vec![PromptCategory::Other, PromptCategory::Debugging]);
        assert_eq!(wildcard.as_deref(), Some("planning"));
    }

    #[test]
    fn proposed_wildcard_wins_over_unknown_label() {
        let (cats, wildcard) =
            validate_categories(&labels(&["brainstorm", "design"]), Some("ideation"));
        assert_eq!(cats, vec![PromptCategory::Other]);
        assert_eq!(wildcard.as_deref(), Some("ideation"));
    }

    #[test]
    fn wildcard_dropped_without_other() {
        let (cats, wildcard) = validate_categories(&labels(&["testing"]), Some("qa"));
        assert_eq!(cats, vec![PromptCategory::Testing]);
        assert_eq!(wildcard, None);
    }

    #[test]
    fn empty_labels_become_other() {
        let (cats, wildcard) = validate_categories(&[], None);
        assert_eq!(cats, vec![PromptCategory::Other]);
        assert_eq!(wildcard, None);
    }

    #[test]
    fn matching_prefers_explicit_index() {
        let entries = vec![
            RawClassification {
                index: Some(2),
                categories: labels(&["testing"]),
                custom_category: None,
            },
            RawClassification {
                index: Some(1),
                categories: labels(&["debugging"]),
                custom_category: None,
            },
        ];
        let out = match_results(&group(2), &entries);
        assert_eq!(out[0].categories, vec![PromptCategory::Debugging]);
        assert_eq!(out[1].categories, vec![PromptCategory::Testing]);
    }

    #[test]
    fn matching_falls_back_to_position_then_missing() {
        let entries = vec![
            RawClassification {
                index: None,
                categories: labels(&["question"]),
                custom_category: None,
            },
            RawClassification {
                index: Some(7),
                categories: labels(&["review"]),
                custom_category: None,
            },
        ];
        let out = match_results(&group(3), &entries);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].categories, vec![PromptCategory::Question]);
        assert_eq!(out[1].categories, vec![PromptCategory::Review]);
        assert_eq!(out[2].categories, vec![PromptCategory::Other]);
        assert_eq!(out[2].wildcard.as_deref(), Some(MISSING_RESULT_LABEL));
        assert_eq!(out[2].text, "prompt 2");
    }

    #[test]
    fn catch_all_appears_once() {
        let (cats, wildcard) = validate_categories(&labels(&["planning", "other"]), None);
        assert_eq!(cats, vec![PromptCategory::Other]);
        assert_eq!(wildcard.as_deref(), Some("planning"));

        let (cats, wildcard) = validate_categories(&labels(&["other", "OTHER "]), None);
        assert_eq!(cats, vec![PromptCategory::Other]);
        assert_eq!(wildcard, None);
    }

    #[test]
    fn repeated_taxonomy_labels_collapse() {
        let (cats, _) =
            validate_categories(&labels(&["testing", " Testing", "debugging"]), None);
        assert_eq!(cats, vec![PromptCategory::Testing, PromptCategory::Debugging]);
    }

    #[test]
    fn single_prompt_with_unknown_and_other_is_not_multi_category() {
        let reply = r#"[{"index": 1, "categories": ["planning", "other"]}]"#;
        let out = match_results(&group(1), &parse_batch_response(reply, 1));
        let metrics = crate::semantic::calculate_semantic_metrics(&out).unwrap();
        assert_eq!(metrics.category_counts.get("other"), Some(&1));
        assert_eq!(metrics.category_stats[0].percentage, 100.0);
        assert_eq!(metrics.multi_category_count, 0);
    }

    #[test]
    fn integral_float_index_keeps_priority() {
        let reply = r#"[
            {"index": 2.0, "categories": ["review"]},
            {"index": 1.0, "categories": ["question"]}
        ]"#;
        let entries = parse_batch_response(reply, 2);
        assert_eq!(entries[0].index, Some(2));
        assert_eq!(parse_batch_response(r#"[{"index": 1.5}]"#, 1)[0].index, None);

        let out = match_results(&group(2), &entries);
        assert_eq!(out[0].categories, vec![PromptCategory::Question]);
        assert_eq!(out[1].categories, vec![PromptCategory::Review]);
    }
}
