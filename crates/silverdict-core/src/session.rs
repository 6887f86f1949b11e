use silverdict_types::{FtsMatch, SuggestionResponse};

/// Result of offering a suggestion response to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionApply {
    Applied,
    /// Not newer than what the session already shows; dropped untouched
    Stale,
}

/// State of one search screen. Owned and mutated by its controller only.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub search_term: String,
    pub active_group: String,
    /// Dictionaries the current article came from, in display order
    pub active_dictionaries: Vec<String>,
    pub article: String,
    pub suggestion_timestamp: u64,
    pub suggestions: Vec<String>,
    pub selected_index: usize,
    /// Entries found by full-text search
    pub fts_matches: Vec<FtsMatch>,
}

impl SearchSession {
    pub fn new(group: &str) -> Self {
        Self {
            active_group: group.to_string(),
            suggestions: vec![String::new()],
            ..Self::default()
        }
    }

    /// An empty term shows history, anything else shows suggestions
    pub fn viewing_history(&self) -> bool {
        self.search_term.is_empty()
    }

    /// Apply `response` only when it is strictly newer than the last one applied
    pub fn accept_suggestions(&mut self, response: SuggestionResponse) -> SuggestionApply {
        if response.timestamp <= self.suggestion_timestamp {
            tracing::debug!(
                "Dropping stale suggestions ({} <= {})",
                response.timestamp,
                self.suggestion_timestamp
            );
            return SuggestionApply::Stale;
        }

        let suggestions: Vec<String> = response
            .suggestions
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        self.suggestion_timestamp = response.timestamp;
        self.suggestions = if suggestions.is_empty() {
            vec![String::new()]
        } else {
            suggestions
        };
        SuggestionApply::Applied
    }

    /// Local reset used for an empty term; `timestamp` invalidates anything in flight
    pub fn reset_suggestions(&mut self, timestamp: u64, placeholder: Vec<String>) {
        self.suggestion_timestamp = self.suggestion_timestamp.max(timestamp);
        self.suggestions = placeholder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(timestamp: u64, suggestions: &[&str]) -> SuggestionResponse {
        SuggestionResponse {
            timestamp,
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn newer_response_survives_late_older_one() {
        let mut session = SearchSession::new("Default Group");

        assert_eq!(
            session.accept_suggestions(response(200, &["app", "apple", "application"])),
            SuggestionApply::Applied
        );
        assert_eq!(
            session.accept_suggestions(response(100, &["ap", "apex"])),
            SuggestionApply::Stale
        );

        assert_eq!(session.suggestions, vec!["app", "apple", "application"]);
        assert_eq!(session.suggestion_timestamp, 200);
    }

    #[test]
    fn equal_timestamp_is_stale() {
        let mut session = SearchSession::new("Default Group");
        session.accept_suggestions(response(100, &["one"]));
        assert_eq!(
            session.accept_suggestions(response(100, &["two"])),
            SuggestionApply::Stale
        );
        assert_eq!(session.suggestions, vec!["one"]);
    }

    #[test]
    fn blank_entries_are_filtered_with_placeholder_fallback() {
        let mut session = SearchSession::new("Default Group");
        session.accept_suggestions(response(1, &["", "cat", ""]));
        assert_eq!(session.suggestions, vec!["cat"]);

        session.accept_suggestions(response(2, &["", ""]));
        assert_eq!(session.suggestions, vec![""]);
    }

    #[test]
    fn reset_invalidates_in_flight_responses() {
        let mut session = SearchSession::new("Default Group");
        session.reset_suggestions(500, vec![String::new()]);
        assert_eq!(
            session.accept_suggestions(response(400, &["late"])),
            SuggestionApply::Stale
        );
        assert_eq!(session.suggestions, vec![""]);
    }
}
