//! Conversational context for prompts and the per-prompt text budget

use std::collections::HashMap;

use super::types::PromptWithContext;
use crate::core::ExtractedPrompt;

/// Characters per rendered prompt entry (text + both context directions)
pub(crate) const MAX_PROMPT_CHARS: usize = 3000;
const TRUNCATION_MARKER: &str = "...";
const EMPTY_CONTEXT: &str = "(none)";
const MAX_CONTEXT_MESSAGES: usize = 2;
/// Room kept for quotes and the marker before admitting a message
const CONTEXT_RESERVE: i64 = 10;
/// Quotes plus separator for an admitted message
const CONTEXT_ENTRY_COST: i64 = 4;

/// Attach up to `window` same-session neighbors on each side of every prompt.
/// Output order follows `prompts`.
pub(crate) fn add_context_to_prompts(
    prompts: &[ExtractedPrompt],
    window: usize,
) -> Vec<PromptWithContext> {
    // Positions into `prompts`, grouped per session
    let mut by_session: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, prompt) in prompts.iter().enumerate() {
        by_session.entry(&prompt.session_id).or_default().push(pos);
    }

    // rank[pos] = (session group, position inside the time-ordered group)
    let mut rank: Vec<(&str, usize)> = vec![("", 0); prompts.len()];
    for (session_id, group) in &mut by_session {
        group.sort_by_key(|&pos| prompts[pos].timestamp);
        for (idx, &pos) in group.iter().enumerate() {
            rank[pos] = (*session_id, idx);
        }
    }

    prompts
        .iter()
        .zip(rank)
        .map(|(prompt, (session_id, idx))| {
            let group = by_session
                .get(session_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let texts = |range: std::ops::Range<usize>| -> Vec<String> {
                group[range]
                    .iter()
                    .map(|&pos| prompts[pos].text.clone())
                    .collect()
            };

            let before = idx.saturating_sub(window)..idx;
            let after = (idx + 1).min(group.len())..(idx + window + 1).min(group.len());

            PromptWithContext {
                prompt: prompt.clone(),
                context_before: texts(before),
                context_after: texts(after),
            }
        })
        .collect()
}

/// A prompt entry cut down to fit the budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetedEntry {
    pub(crate) text: String,
    pub(crate) context_before: String,
    pub(crate) context_after: String,
}

/// First `n` chars of `s`, never splitting a character
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// 70% of `total_budget` goes to the prompt text, 15% to each context
/// direction. At most two context messages per direction survive.
pub(crate) fn truncate_with_budget(
    text: &str,
    context_before: &[String],
    context_after: &[String],
    total_budget: usize,
) -> BudgetedEntry {
    let prompt_budget = total_budget * 70 / 100;
    let context_budget = total_budget * 15 / 100;

    let text = if text.chars().count() > prompt_budget {
        format!("{}{TRUNCATION_MARKER}", take_chars(text, prompt_budget))
    } else {
        text.to_string()
    };

    BudgetedEntry {
        text,
        context_before: format_context(context_before, context_budget),
        context_after: format_context(context_after, context_budget),
    }
}

fn format_context(messages: &[String], budget: usize) -> String {
    let mut rendered = Vec::new();
    let mut remaining = budget as i64;

    for msg in messages.iter().take(MAX_CONTEXT_MESSAGES) {
        let max_len = remaining - CONTEXT_RESERVE;
        if max_len <= 0 {
            break;
        }
        let len = msg.chars().count() as i64;
        if len > max_len {
            rendered.push(format!(
                "\"{}{TRUNCATION_MARKER}\"",
                take_chars(msg, max_len as usize)
            ));
            remaining = 0;
        } else {
            rendered.push(format!("\"{msg}\""));
            remaining -= len + CONTEXT_ENTRY_COST;
        }
    }

    if rendered.is_empty() {
        EMPTY_CONTEXT.to_string()
    } else {
        rendered.join(", ")
    }
}
