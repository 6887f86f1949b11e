use silverdict_api::{ApiError, LookupApi};
use silverdict_types::{ArticleResponse, FtsArticleResponse, SurfaceKind};

use crate::encoding::{canonical_term, encode_component};

/// Per-screen differences in how a search is carried out
pub trait SurfaceRules {
    /// Whether the input may already be percent-encoded (link targets)
    fn decodes_input(&self) -> bool;
    fn refreshes_history(&self) -> bool;
    /// Whether the article pane jumps back to the top after a search
    fn scrolls_to_top(&self) -> bool;
}

impl SurfaceRules for SurfaceKind {
    fn decodes_input(&self) -> bool {
        !matches!(self, SurfaceKind::FullText)
    }

    fn refreshes_history(&self) -> bool {
        matches!(self, SurfaceKind::Query)
    }

    fn scrolls_to_top(&self) -> bool {
        !matches!(self, SurfaceKind::Query)
    }
}

/// A search ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub surface: SurfaceKind,
    pub group: String,
    /// Canonically encoded path segment
    pub term: String,
    pub anchor: Option<String>,
    /// Position in the sequence of searches issued by one controller
    pub generation: u64,
}

#[derive(Debug)]
pub enum QueryPayload {
    Articles(ArticleResponse),
    FullText(FtsArticleResponse),
}

impl QueryPayload {
    pub fn articles(&self) -> &str {
        match self {
            QueryPayload::Articles(r) => &r.articles,
            QueryPayload::FullText(r) => &r.articles,
        }
    }
}

#[derive(Debug)]
pub struct QueryOutcome {
    pub request: QueryRequest,
    pub result: Result<QueryPayload, ApiError>,
}

impl QueryRequest {
    /// `None` for empty input
    pub fn prepare(
        surface: SurfaceKind,
        group: &str,
        raw: &str,
        anchor: Option<String>,
        generation: u64,
    ) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let term = if surface.decodes_input() {
            canonical_term(raw)
        } else {
            encode_component(raw)
        };

        Some(Self {
            surface,
            group: group.to_string(),
            term,
            anchor,
            generation,
        })
    }

    pub async fn send<A>(self, api: &A) -> QueryOutcome
    where
        A: LookupApi + ?Sized,
    {
        tracing::debug!(
            "Searching {} {:?} in {} (#{})",
            self.surface,
            self.term,
            self.group,
            self.generation
        );

        let result = match self.surface {
            SurfaceKind::Query => api
                .query(&self.group, &self.term)
                .await
                .map(QueryPayload::Articles),
            SurfaceKind::Anki => api
                .anki(&self.group, &self.term)
                .await
                .map(QueryPayload::Articles),
            SurfaceKind::FullText => api
                .full_text_search(&self.term)
                .await
                .map(QueryPayload::FullText),
        };

        QueryOutcome {
            request: self,
            result,
        }
    }
}

/// Work left after a search result has been committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    RefreshHistory,
    ScrollToAnchor(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCommit {
    Committed(Vec<Followup>),
    /// A newer search was issued while this one was in flight
    Superseded,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_prepares_nothing() {
        assert_eq!(
            QueryRequest::prepare(SurfaceKind::Query, "Default Group", "", None, 1),
            None
        );
    }

    #[test]
    fn query_terms_are_canonicalised() {
        let request =
            QueryRequest::prepare(SurfaceKind::Query, "Default Group", "caf%C3%A9", None, 1)
                .unwrap();
        assert_eq!(request.term, "caf%C3%A9");

        let request =
            QueryRequest::prepare(SurfaceKind::Anki, "Default Group", "50%", None, 2).unwrap();
        assert_eq!(request.term, "50%25");
    }

    #[test]
    fn full_text_terms_are_encoded_verbatim() {
        let request =
            QueryRequest::prepare(SurfaceKind::FullText, "Xapian", "caf%C3%A9", None, 1).unwrap();
        assert_eq!(request.term, "caf%25C3%25A9");
    }
}
