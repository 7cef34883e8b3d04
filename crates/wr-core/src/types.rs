use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Category applied when a caller does not tag an entry.
pub const DEFAULT_CATEGORY: &str = "INTEL";

/// Output format for CLI responses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Normalize a source or category label for display in an entry heading.
///
/// Labels are free text and are only upper-cased; whitespace is kept as
/// written. A blank category falls back to [`DEFAULT_CATEGORY`].
pub fn normalize_label(label: &str) -> String {
    label.to_uppercase()
}

pub fn normalize_category(category: &str) -> String {
    if category.trim().is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        normalize_label(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_uppercases() {
        assert_eq!(normalize_label("claude"), "CLAUDE");
        assert_eq!(normalize_label("gemini-cli"), "GEMINI-CLI");
    }

    #[test]
    fn test_normalize_label_keeps_whitespace() {
        assert_eq!(normalize_label(" codex"), " CODEX");
        assert_eq!(normalize_category(" fix "), " FIX ");
    }

    #[test]
    fn test_normalize_label_unicode() {
        assert_eq!(normalize_label("café"), "CAFÉ");
        assert_eq!(normalize_label("straße"), "STRASSE");
    }

    #[test]
    fn test_normalize_category_defaults_when_blank() {
        assert_eq!(normalize_category(""), DEFAULT_CATEGORY);
        assert_eq!(normalize_category("   "), DEFAULT_CATEGORY);
        assert_eq!(normalize_category("loot"), "LOOT");
    }

    #[test]
    fn test_output_format_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
        let parsed: OutputFormat = serde_json::from_str("\"text\"").unwrap();
        assert_eq!(parsed, OutputFormat::Text);
    }
}
