use std::env;

use serde::{Deserialize, Serialize};

fn default_locale() -> String {
    "en-GB".to_string()
}

fn default_suggestion_rows() -> usize {
    10
}

/// How the suggestion list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionLayout {
    /// One row per suggestion, a single blank row when there are none
    #[default]
    Compact,
    /// A fixed block of rows sized to the configured suggestion count
    FixedRows,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub suggestion_layout: SuggestionLayout,
    /// Rows shown by the fixed layout before the backend reports its own count
    #[serde(default = "default_suggestion_rows")]
    pub suggestion_rows: usize,
}

impl UiConfig {
    pub fn new() -> Self {
        let locale = env::var("LOCALE").unwrap_or_else(|_| default_locale());

        let suggestion_layout = match env::var("SUGGESTION_LAYOUT").as_deref() {
            Ok("fixed_rows") | Ok("fixed") => SuggestionLayout::FixedRows,
            _ => SuggestionLayout::Compact,
        };

        let suggestion_rows = env::var("SUGGESTION_ROWS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_suggestion_rows);

        Self {
            locale,
            suggestion_layout,
            suggestion_rows,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            suggestion_layout: SuggestionLayout::default(),
            suggestion_rows: default_suggestion_rows(),
        }
    }
}
