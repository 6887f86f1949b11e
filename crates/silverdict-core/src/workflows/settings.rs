use silverdict_api::ManagementApi;

use crate::error::{ValidationError, WorkflowError};
use crate::library::Library;
use crate::workflow::EntityWorkflow;

/// How many lookups the backend remembers; zero turns history off
pub struct SetHistorySize(pub i64);

#[async_trait::async_trait]
impl EntityWorkflow for SetHistorySize {
    type Output = i64;

    fn failure_key(&self) -> &'static str {
        "failure-changing-history-size"
    }

    fn validate(&self, _library: &Library) -> Result<(), ValidationError> {
        if self.0 < 0 {
            return Err(ValidationError::InvalidSize(self.0));
        }
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<i64, WorkflowError> {
        Ok(api.set_history_size(self.0).await?)
    }

    fn on_success(&self, library: &mut Library, output: i64) {
        library.history_size = output;
        library
            .history
            .truncate(usize::try_from(output).unwrap_or_default());
    }
}

/// Length of the suggestion list
pub struct SetSuggestionSize(pub i64);

#[async_trait::async_trait]
impl EntityWorkflow for SetSuggestionSize {
    type Output = i64;

    fn failure_key(&self) -> &'static str {
        "failure-changing-suggestion-size"
    }

    fn validate(&self, _library: &Library) -> Result<(), ValidationError> {
        if self.0 < 1 {
            return Err(ValidationError::InvalidSize(self.0));
        }
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<i64, WorkflowError> {
        Ok(api.set_num_suggestions(self.0).await?)
    }

    fn on_success(&self, library: &mut Library, output: i64) {
        library.suggestion_size = output;
    }
}

pub struct ClearHistory;

#[async_trait::async_trait]
impl EntityWorkflow for ClearHistory {
    type Output = Vec<String>;

    fn failure_key(&self) -> &'static str {
        "failure-clearing-history"
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Vec<String>, WorkflowError> {
        Ok(api.clear_history().await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<String>) {
        library.history = output;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Lookup table behind suggestions
    Ngram,
    /// Full-text index
    Xapian,
}

pub struct RebuildIndex(pub IndexKind);

#[async_trait::async_trait]
impl EntityWorkflow for RebuildIndex {
    type Output = bool;

    fn failure_key(&self) -> &'static str {
        "failure-rebuilding-index"
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<bool, WorkflowError> {
        let body = match self.0 {
            IndexKind::Ngram => api.create_ngram_table().await?,
            IndexKind::Xapian => api.create_xapian_index().await?,
        };
        Ok(body.success)
    }

    fn on_success(&self, _library: &mut Library, output: bool) {
        if output {
            tracing::info!("Rebuilt {:?} index", self.0);
        } else {
            tracing::warn!("Backend did not rebuild the {:?} index", self.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Backend, Fixture};
    use crate::workflow::{WorkflowOutcome, run_workflow};

    #[tokio::test]
    async fn size_bounds() {
        let fx = Fixture::new(Backend::default()).await;

        assert_eq!(
            run_workflow(&SetHistorySize(-1), &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Rejected(ValidationError::InvalidSize(-1))
        );
        assert_eq!(
            run_workflow(&SetSuggestionSize(0), &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Rejected(ValidationError::InvalidSize(0))
        );
        assert_eq!(fx.notifier.messages()[1], "0 is not a valid size.");

        assert_eq!(
            run_workflow(&SetHistorySize(0), &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Applied
        );
        assert_eq!(
            run_workflow(&SetSuggestionSize(25), &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Applied
        );
        let library = fx.state.library.read().await;
        assert_eq!(library.history_size, 0);
        assert_eq!(library.suggestion_size, 25);
    }

    #[tokio::test]
    async fn shrinking_history_truncates_local_copy() {
        let mut backend = Backend::default();
        backend.history = vec!["c".into(), "b".into(), "a".into()];
        let fx = Fixture::new(backend).await;

        run_workflow(&SetHistorySize(2), &fx.api, &fx.state, &fx.alerts).await;
        assert_eq!(fx.state.library.read().await.history, vec!["c", "b"]);

        run_workflow(&ClearHistory, &fx.api, &fx.state, &fx.alerts).await;
        assert!(fx.state.library.read().await.history.is_empty());
    }

    #[tokio::test]
    async fn index_rebuilds_hit_their_endpoints() {
        let fx = Fixture::new(Backend::default()).await;
        for kind in [IndexKind::Ngram, IndexKind::Xapian] {
            assert_eq!(
                run_workflow(&RebuildIndex(kind), &fx.api, &fx.state, &fx.alerts).await,
                WorkflowOutcome::Applied
            );
        }
        let calls = fx.api.calls();
        assert!(calls.contains(&"create_ngram_table".to_string()));
        assert!(calls.contains(&"create_xapian_index".to_string()));
    }
}
