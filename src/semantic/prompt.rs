//! Classification instruction rendering

use super::category::PromptCategory;
use super::context::{MAX_PROMPT_CHARS, truncate_with_budget};
use super::types::PromptWithContext;

/// Taxonomy as a markdown list, catch-all last
pub(crate) fn build_category_list() -> String {
    let mut lines: Vec<String> = PromptCategory::ALL
        .iter()
        .filter(|c| **c != PromptCategory::Other)
        .map(|c| format!("- **{}**: {}", c.as_str(), c.description()))
        .collect();
    lines.push(format!(
        "- **{}**: Use when prompt doesn't fit above categories. Provide a custom_category name.",
        PromptCategory::Other.as_str()
    ));
    lines.join("\n")
}

/// One `### Prompt {n}` section per group member, 1-based
pub(crate) fn build_prompts_section(group: &[PromptWithContext]) -> String {
    group
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry = truncate_with_budget(
                &item.prompt.text,
                &item.context_before,
                &item.context_after,
                MAX_PROMPT_CHARS,
            );
            format!(
                "### Prompt {}\nContext before: {}\nText: \"{}\"\nContext after: {}",
                i + 1,
                entry.context_before,
                entry.text,
                entry.context_after
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Full instruction for one group
pub(crate) fn build_instruction(category_list: &str, group: &[PromptWithContext]) -> String {
    let prompts_section = build_prompts_section(group);
    format!(
        r#"You are classifying user prompts from AI coding assistant sessions.

## Categories (assign 1-3 per prompt that best describe the prompt)

{category_list}

## Prompts to Classify

{prompts_section}

## Instructions

For each prompt:
1. Analyze the prompt considering its conversation context
2. Assign 1-3 categories that best describe the prompt's intent
3. If a prompt doesn't fit any predefined category well, use "other" and provide a custom_category name

## Response Format (JSON array only)

Return ONLY a valid JSON array with one object per prompt, in the same order as listed above.
Each object must have: "index", "categories", "custom_category"

Example:
[
  {{"index": 1, "categories": ["debugging", "question"], "custom_category": null}},
  {{"index": 2, "categories": ["implementation"], "custom_category": null}},
  {{"index": 3, "categories": ["other"], "custom_category": "planning"}}
]
"#
    )
}
