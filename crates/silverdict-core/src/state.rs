use silverdict_api::{ApiError, LookupApi, ManagementApi};
use silverdict_config::Config;
use tokio::sync::RwLock;

use crate::library::Library;

/// Application state shared by every screen: one writer at a time, many readers
#[derive(Default)]
pub struct AppState {
    pub config: RwLock<Config>,
    pub library: RwLock<Library>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            library: RwLock::new(Library::default()),
        }
    }

    /// Load the whole library from the backend, all requests in parallel
    pub async fn initialise<A>(&self, api: &A) -> Result<(), ApiError>
    where
        A: LookupApi + ManagementApi + ?Sized,
    {
        let (
            dictionaries,
            groups,
            groupings,
            history,
            history_size,
            suggestion_size,
            formats,
            sources,
        ) = tokio::try_join!(
            api.dictionaries(),
            api.groups(),
            api.groupings(),
            api.history(),
            api.history_size(),
            api.num_suggestions(),
            api.formats(),
            api.sources(),
        )?;

        let mut library = self.library.write().await;
        library.set_dictionaries(dictionaries);
        library.groups = groups;
        library.groupings = groupings;
        library.history = history;
        library.history_size = history_size;
        library.suggestion_size = suggestion_size;
        library.formats = formats;
        library.sources = sources;

        tracing::info!(
            "Library loaded: {} dictionaries, {} groups",
            library.dictionaries.len(),
            library.groups.len()
        );
        Ok(())
    }
}
