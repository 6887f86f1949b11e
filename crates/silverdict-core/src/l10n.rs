use std::collections::HashMap;

const EN_GB: &[(&str, &str)] = &[
    ("search-placeholder", "Search"),
    ("failure-fetching-suggestions", "Failed to fetch suggestions."),
    ("failure-fetching-articles", "Failed to fetch articles."),
    ("failure-fetching-history", "Failed to fetch history."),
    ("failure-fetching-headword-count", "Failed to fetch headword count."),
    (
        "app-context-message-failure-initialising",
        "Failed to load dictionaries, groups and settings.",
    ),
    ("article-view-menu-search-in-new-tab", "Search in new tab"),
    ("alert-empty-name", "The name must not be empty."),
    ("alert-duplicate-group", "A group named {0} already exists."),
    ("alert-duplicate-source", "The source {0} has already been added."),
    ("alert-duplicate-dictionary", "A dictionary named {0} already exists."),
    ("alert-unknown-dictionary", "There is no dictionary named {0}."),
    ("alert-unsupported-format", "{0} is not a supported format."),
    ("alert-invalid-language-code", "{0} is not a valid ISO 639-1 language code."),
    ("alert-default-group-protected", "The default group cannot be renamed or deleted."),
    ("alert-unknown-group", "There is no group named {0}."),
    ("alert-invalid-size", "{0} is not a valid size."),
    ("alert-missing-field", "The field {0} is required."),
    ("alert-invalid-dictionary", "The dictionary information is invalid."),
    ("alert-invalid-source", "The source is invalid."),
    ("failure-adding-group", "Failed to add group."),
    ("failure-renaming-group", "Failed to rename group."),
    ("failure-changing-group-lang", "Failed to change group languages."),
    ("failure-deleting-group", "Failed to delete group."),
    ("failure-reordering-groups", "Failed to reorder groups."),
    ("failure-adding-dictionary", "Failed to add dictionary."),
    ("failure-renaming-dictionary", "Failed to rename dictionary."),
    ("failure-deleting-dictionary", "Failed to delete dictionary."),
    ("failure-reordering-dictionaries", "Failed to reorder dictionaries."),
    ("failure-updating-groupings", "Failed to update group membership."),
    ("failure-adding-source", "Failed to add source."),
    ("failure-deleting-source", "Failed to delete source."),
    ("failure-scanning-sources", "Failed to scan sources."),
    ("failure-changing-history-size", "Failed to change history size."),
    ("failure-changing-suggestion-size", "Failed to change number of suggestions."),
    ("failure-clearing-history", "Failed to clear history."),
    ("failure-rebuilding-index", "Failed to rebuild the index."),
];

/// Localised UI strings
#[derive(Debug, Clone)]
pub struct Strings {
    locale: String,
    table: HashMap<&'static str, &'static str>,
}

impl Strings {
    pub fn new(locale: &str) -> Self {
        let table = match locale {
            "en-GB" => EN_GB,
            other => {
                tracing::warn!("No translation for locale {other}, falling back to en-GB");
                EN_GB
            }
        };

        Self {
            locale: locale.to_string(),
            table: table.iter().copied().collect(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Missing keys render as the key itself
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).copied().unwrap_or(key)
    }

    /// Substitute `{0}`, `{1}`, ... with `args`
    pub fn format(&self, key: &str, args: &[String]) -> String {
        let mut message = self.get(key).to_string();
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{i}}}"), arg);
        }
        message
    }
}

impl Default for Strings {
    fn default() -> Self {
        Self::new("en-GB")
    }
}
