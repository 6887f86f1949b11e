use silverdict_api::ManagementApi;

use crate::error::{ValidationError, WorkflowError};
use crate::library::Library;
use crate::notify::Alerts;
use crate::state::AppState;

/// A management operation: check the input locally, send it, then fold the
/// backend's answer into the library.
#[async_trait::async_trait]
pub trait EntityWorkflow: Send + Sync {
    type Output: Send;

    /// Localisation key of the alert shown when the request fails
    fn failure_key(&self) -> &'static str;

    fn validate(&self, _library: &Library) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Self::Output, WorkflowError>;

    fn on_success(&self, library: &mut Library, output: Self::Output);

    /// Called after a failed request, before the alert
    fn on_error(&self, _library: &mut Library) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Applied,
    Rejected(ValidationError),
    Failed,
}

/// Validate, submit and apply `workflow`, alerting on every failure path
pub async fn run_workflow<W>(
    workflow: &W,
    api: &dyn ManagementApi,
    state: &AppState,
    alerts: &Alerts,
) -> WorkflowOutcome
where
    W: EntityWorkflow + ?Sized,
{
    let validated = workflow.validate(&*state.library.read().await);
    if let Err(e) = validated {
        alerts.validation(&e);
        return WorkflowOutcome::Rejected(e);
    }

    match workflow.submit(api).await {
        Ok(output) => {
            workflow.on_success(&mut *state.library.write().await, output);
            WorkflowOutcome::Applied
        }
        Err(WorkflowError::Rejected(e)) => {
            alerts.validation(&e);
            WorkflowOutcome::Rejected(e)
        }
        Err(WorkflowError::Api(e)) => {
            workflow.on_error(&mut *state.library.write().await);
            alerts.failure(workflow.failure_key(), &e);
            WorkflowOutcome::Failed
        }
    }
}

/// Shared checks for names typed by the user
pub(crate) fn require_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name)
    }
}
