use silverdict_types::{ArticleResponse, FtsArticleResponse, SuggestionResponse};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Read side of the backend used by the search screens.
///
/// Every `term` argument is a path segment that is already percent-encoded;
/// group names are encoded by the implementation.
#[async_trait::async_trait]
pub trait LookupApi: Send + Sync {
    /// Autocomplete candidates, tagged with the caller's timestamp
    async fn suggestions(
        &self,
        group: &str,
        term: &str,
        timestamp: u64,
    ) -> Result<SuggestionResponse, ApiError>;

    /// Rendered articles plus the names of the dictionaries that matched
    async fn query(&self, group: &str, term: &str) -> Result<ArticleResponse, ApiError>;

    /// Same as [`LookupApi::query`] but rendered for card making
    async fn anki(&self, group: &str, term: &str) -> Result<ArticleResponse, ApiError>;

    async fn full_text_search(&self, term: &str) -> Result<FtsArticleResponse, ApiError>;

    /// Lookup history, most recent first
    async fn history(&self) -> Result<Vec<String>, ApiError>;
}

fn group_segment(group: &str) -> String {
    urlencoding::encode(group).into_owned()
}

#[async_trait::async_trait]
impl LookupApi for ApiClient {
    async fn suggestions(
        &self,
        group: &str,
        term: &str,
        timestamp: u64,
    ) -> Result<SuggestionResponse, ApiError> {
        let path = format!(
            "/suggestions/{}/{}?timestamp={}",
            group_segment(group),
            term,
            timestamp
        );
        self.get(&path).await
    }

    async fn query(&self, group: &str, term: &str) -> Result<ArticleResponse, ApiError> {
        let path = format!("/query/{}/{}?dicts=true", group_segment(group), term);
        self.get(&path).await
    }

    async fn anki(&self, group: &str, term: &str) -> Result<ArticleResponse, ApiError> {
        let path = format!("/anki/{}/{}?dicts=true", group_segment(group), term);
        self.get(&path).await
    }

    async fn full_text_search(&self, term: &str) -> Result<FtsArticleResponse, ApiError> {
        let path = format!("/fts/{}?dicts=true", term);
        self.get(&path).await
    }

    async fn history(&self) -> Result<Vec<String>, ApiError> {
        self.get("/management/history").await
    }
}
