use silverdict_api::ManagementApi;
use silverdict_types::LibrarySnapshot;

use crate::error::{ValidationError, WorkflowError};
use crate::library::Library;
use crate::workflow::EntityWorkflow;

/// A directory the backend scans for dictionaries
pub struct AddSource {
    source: String,
}

impl AddSource {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.trim().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for AddSource {
    type Output = Vec<String>;

    fn failure_key(&self) -> &'static str {
        "failure-adding-source"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        if self.source.is_empty() {
            return Err(ValidationError::MissingField("source"));
        }
        if library.sources.contains(&self.source) {
            return Err(ValidationError::DuplicateSource(self.source.clone()));
        }
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Vec<String>, WorkflowError> {
        if !api.validate_source(&self.source).await? {
            return Err(ValidationError::InvalidSource.into());
        }
        Ok(api.add_source(&self.source).await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<String>) {
        tracing::info!("Added source {}", self.source);
        library.sources = output;
    }
}

pub struct DeleteSource {
    source: String,
}

impl DeleteSource {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for DeleteSource {
    type Output = Vec<String>;

    fn failure_key(&self) -> &'static str {
        "failure-deleting-source"
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Vec<String>, WorkflowError> {
        Ok(api.delete_source(&self.source).await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<String>) {
        library.sources = output;
    }
}

/// Rescan every source and pick up new dictionaries
pub struct ScanSources;

#[async_trait::async_trait]
impl EntityWorkflow for ScanSources {
    type Output = LibrarySnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-scanning-sources"
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<LibrarySnapshot, WorkflowError> {
        Ok(api.scan().await?)
    }

    fn on_success(&self, library: &mut Library, output: LibrarySnapshot) {
        let before = library.dictionaries.len();
        library.apply_library(output);
        tracing::info!(
            "Scan finished: {} dictionaries ({} before)",
            library.dictionaries.len(),
            before
        );
    }
}
