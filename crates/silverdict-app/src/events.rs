use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use silverdict_api::{LookupApi, ManagementApi, SilverDictApi};
use silverdict_core::controller::{ControllerSettings, Requests, SearchController};
use silverdict_core::dispatcher::{Followup, QueryOutcome, QueryRequest};
use silverdict_core::document::MemoryDocument;
use silverdict_core::notify::Alerts;
use silverdict_core::state::AppState;
use silverdict_core::suggestions::{SuggestionOutcome, SuggestionRequest};
use silverdict_types::{AppEvent, SurfaceKind};
use tokio_util::sync::CancellationToken;

use crate::ui::{Frame, Renderer};

pub mod completion;
pub mod library;
pub mod search_input;

use completion::handle_completion;
use library::{handle_clear_history, handle_reload};
use search_input::handle_search_input;

/// Results of background requests, fed back into the event loop
#[derive(Debug)]
pub enum Completion {
    Suggestions(SuggestionOutcome),
    Article(QueryOutcome),
    HistoryRefreshed,
}

/// Backend handles shared by every screen
#[derive(Clone)]
pub struct Services {
    pub state: Arc<AppState>,
    pub api: Arc<dyn SilverDictApi>,
    /// The same backend, seen through one half
    pub lookup: Arc<dyn LookupApi>,
    pub management: Arc<dyn ManagementApi>,
    pub alerts: Alerts,
}

impl Services {
    pub fn new<A>(api: Arc<A>, state: Arc<AppState>, alerts: Alerts) -> Self
    where
        A: SilverDictApi + 'static,
    {
        Self {
            state,
            lookup: api.clone(),
            management: api.clone(),
            api,
            alerts,
        }
    }
}

/// The one search screen currently shown, plus its document
pub struct Screen {
    pub services: Services,
    pub settings: ControllerSettings,
    pub document: Arc<MemoryDocument>,
    pub controller: SearchController,
    /// One-off message under the article, cleared on the next event
    pub notice: Option<String>,
    done_tx: AsyncSender<Completion>,
}

impl Screen {
    pub fn new(
        services: Services,
        settings: ControllerSettings,
        surface: SurfaceKind,
        done_tx: AsyncSender<Completion>,
    ) -> Self {
        let document = Arc::new(MemoryDocument::new());
        let controller = Self::controller_for(&services, &settings, surface, &document);
        Self {
            services,
            settings,
            document,
            controller,
            notice: None,
            done_tx,
        }
    }

    fn controller_for(
        services: &Services,
        settings: &ControllerSettings,
        surface: SurfaceKind,
        document: &Arc<MemoryDocument>,
    ) -> SearchController {
        SearchController::new(
            surface,
            settings.clone(),
            Arc::clone(&services.lookup),
            Arc::clone(&services.state),
            document.clone(),
            services.alerts.clone(),
        )
    }

    /// Replace the controller; the old one cancels its background work on drop
    pub fn switch_surface(&mut self, surface: SurfaceKind) {
        if surface == self.controller.surface() {
            return;
        }
        tracing::info!("Switching to {} screen", surface);
        self.document = Arc::new(MemoryDocument::new());
        self.controller = Self::controller_for(&self.services, &self.settings, surface, &self.document);
    }

    pub fn dispatch(&self, requests: Requests) {
        if let Some(request) = requests.suggestions {
            self.spawn_suggestions(request);
        }
        if let Some(request) = requests.query {
            self.spawn_query(request);
        }
    }

    pub fn spawn_suggestions(&self, request: SuggestionRequest) {
        let api = Arc::clone(&self.services.lookup);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let outcome = request.send(api.as_ref()).await;
            if let Err(e) = done_tx.send(Completion::Suggestions(outcome)).await {
                tracing::debug!("Suggestions arrived after shutdown: {}", e);
            }
        });
    }

    pub fn spawn_query(&self, request: QueryRequest) {
        let api = Arc::clone(&self.services.lookup);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let outcome = request.send(api.as_ref()).await;
            if let Err(e) = done_tx.send(Completion::Article(outcome)).await {
                tracing::debug!("Article arrived after shutdown: {}", e);
            }
        });
    }

    pub fn spawn_followup(&self, followup: Followup) {
        let task = self.controller.followup_task(followup.clone());
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            // A failed or cancelled refresh leaves the old history in place
            if task.await && followup == Followup::RefreshHistory {
                if let Err(e) = done_tx.send(Completion::HistoryRefreshed).await {
                    tracing::debug!("History refreshed after shutdown: {}", e);
                }
            }
        });
    }

    pub async fn present(&self, renderer: &Renderer) {
        let list = self.controller.visible_list().await;
        renderer.present(&Frame {
            controller: &self.controller,
            list: &list,
            scroll: self.document.scroll_position(),
            notice: self.notice.as_deref(),
        });
    }
}

/// App's main loop
pub async fn event_loop(
    mut screen: Screen,
    renderer: Renderer,
    events_rx: AsyncReceiver<AppEvent>,
    done_rx: AsyncReceiver<Completion>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let requests = screen.controller.library_changed().await;
    screen.dispatch(requests);
    screen.present(&renderer).await;

    tracing::info!("Event loop started");
    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let event = event?;
                tracing::debug!("Event: {:?}", event);
                screen.notice = None;
                if !handle_events(&mut screen, event).await? {
                    break;
                }
            }
            done = done_rx.recv() => handle_completion(&mut screen, done?).await,
            _ = cancel.cancelled() => break,
        }
        screen.present(&renderer).await;
    }

    tracing::info!("Event loop stopped");
    Ok(())
}

/// Returns `false` once the app should stop
pub async fn handle_events(screen: &mut Screen, event: AppEvent) -> anyhow::Result<bool> {
    match event {
        AppEvent::Shutdown => return Ok(false),
        AppEvent::ConfigChanged => handle_reload(screen).await,
        AppEvent::UiEvent(silverdict_types::UiEvent::ClearHistory) => {
            handle_clear_history(screen).await
        }
        AppEvent::UiEvent(event) => handle_search_input(screen, event).await,
    }
    Ok(true)
}
