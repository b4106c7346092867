//! Fixed prompt taxonomy with an open catch-all

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PromptCategory {
    Question,
    Implementation,
    Debugging,
    Clarification,
    Review,
    Refactoring,
    Exploration,
    Testing,
    Directive,
    Feedback,
    /// Catch-all; may carry a free-text wildcard label
    Other,
}

impl PromptCategory {
    /// Taxonomy order, catch-all last
    pub(crate) const ALL: [PromptCategory; 11] = [
        PromptCategory::Question,
        PromptCategory::Implementation,
        PromptCategory::Debugging,
        PromptCategory::Clarification,
        PromptCategory::Review,
        PromptCategory::Refactoring,
        PromptCategory::Exploration,
        PromptCategory::Testing,
        PromptCategory::Directive,
        PromptCategory::Feedback,
        PromptCategory::Other,
    ];

    /// Exact (already normalized) label lookup
    pub(crate) fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Case-insensitive, trimmed; anything unknown maps to `Other`
    pub(crate) fn from_label(label: &str) -> Self {
        Self::parse(&label.trim().to_lowercase()).unwrap_or(PromptCategory::Other)
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PromptCategory::Question => "question",
            PromptCategory::Implementation => "implementation",
            PromptCategory::Debugging => "debugging",
            PromptCategory::Clarification => "clarification",
            PromptCategory::Review => "review",
            PromptCategory::Refactoring => "refactoring",
            PromptCategory::Exploration => "exploration",
            PromptCategory::Testing => "testing",
            PromptCategory::Directive => "directive",
            PromptCategory::Feedback => "feedback",
            PromptCategory::Other => "other",
        }
    }

    pub(crate) fn description(self) -> &'static str {
        match self {
            PromptCategory::Question => "Asking for information or explanation",
            PromptCategory::Implementation => "Requesting code to be written or features added",
            PromptCategory::Debugging => "Fixing errors, bugs, or issues",
            PromptCategory::Clarification => "Asking for more detail on a prior response",
            PromptCategory::Review => "Code review or verification request",
            PromptCategory::Refactoring => "Restructuring or improving existing code",
            PromptCategory::Exploration => "Understanding codebase structure or concepts",
            PromptCategory::Testing => "Writing or running tests",
            PromptCategory::Directive => "Direct instruction or command to proceed",
            PromptCategory::Feedback => "Correcting or guiding the assistant's approach",
            PromptCategory::Other => "Custom category that doesn't fit predefined ones",
        }
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description for any reported label, wildcard labels included
pub(crate) fn category_description(label: &str) -> String {
    match PromptCategory::parse(label) {
        Some(category) => category.description().to_string(),
        None => format!("Custom category: {label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_is_case_insensitive_and_trimmed() {
        assert_eq!(PromptCategory::from_label("  Debugging "), PromptCategory::Debugging);
        assert_eq!(PromptCategory::from_label("TESTING"), PromptCategory::Testing);
    }

    #[test]
    fn unknown_label_maps_to_other() {
        assert_eq!(PromptCategory::from_label("planning"), PromptCategory::Other);
        assert_eq!(PromptCategory::from_label(""), PromptCategory::Other);
    }

    #[test]
    fn labels_round_trip_through_as_str() {
        for category in PromptCategory::ALL {
            assert_eq!(PromptCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(PromptCategory::ALL.last(), Some(&PromptCategory::Other));
    }

    #[test]
    fn descriptions_for_wildcards() {
        assert_eq!(category_description("testing"), "Writing or running tests");
        assert_eq!(category_description("planning"), "Custom category: planning");
    }
}
