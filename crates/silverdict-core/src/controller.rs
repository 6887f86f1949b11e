use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use silverdict_api::LookupApi;
use silverdict_config::Config;
use silverdict_config::ui::SuggestionLayout;
use silverdict_types::{DEFAULT_GROUP_NAME, FocusTarget, NavKey, SurfaceKind, XAPIAN_GROUP_NAME};
use tokio_util::sync::CancellationToken;

use crate::activator::activate;
use crate::dispatcher::{Followup, QueryCommit, QueryOutcome, QueryPayload, QueryRequest, SurfaceRules};
use crate::document::{Document, WaitOutcome, wait_for_element};
use crate::links::DeepLink;
use crate::navigation::{KeyboardNavigator, NavAction, NavBound};
use crate::notify::Alerts;
use crate::render::{RenderedArticle, render};
use crate::session::{SearchSession, SuggestionApply};
use crate::state::AppState;
use crate::suggestions::{RequestClock, SuggestionOutcome, SuggestionRequest, placeholder};
use crate::view::{ArticleClick, ArticleView};

/// Background followup; resolves to whether it took effect
pub type Task = Pin<Box<dyn Future<Output = bool> + Send + 'static>>;

/// The parts of [`Config`] a search screen reads once at construction
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub api_prefix: String,
    pub layout: SuggestionLayout,
    pub rows: usize,
    pub anchor_wait: Duration,
    pub default_group: String,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_prefix: config.network.base_url().to_string(),
            layout: config.ui.suggestion_layout,
            rows: config.ui.suggestion_rows.max(1),
            anchor_wait: config.search.anchor_wait(),
            default_group: config.search.default_group.clone(),
        }
    }
}

/// Requests a controller wants sent; the caller runs them and feeds back the outcomes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Requests {
    pub suggestions: Option<SuggestionRequest>,
    pub query: Option<QueryRequest>,
}

impl Requests {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_none() && self.query.is_none()
    }
}

/// Result of a click inside the article pane
#[derive(Debug, PartialEq, Eq)]
pub enum ArticleAction {
    Dispatch(QueryRequest),
    OpenInNewTab(String),
    None,
}

/// One search screen: owns its session and turns user input into requests.
///
/// Every method runs on the task that owns the controller; network work is
/// returned to the caller as request values and background [`Task`]s.
pub struct SearchController {
    surface: SurfaceKind,
    settings: ControllerSettings,
    api: Arc<dyn LookupApi>,
    state: Arc<AppState>,
    document: Arc<dyn Document>,
    alerts: Alerts,
    session: SearchSession,
    navigator: KeyboardNavigator,
    clock: RequestClock,
    generation: u64,
    rendered: RenderedArticle,
    deep_link: Option<DeepLink>,
    cancel: CancellationToken,
}

impl SearchController {
    pub fn new(
        surface: SurfaceKind,
        settings: ControllerSettings,
        api: Arc<dyn LookupApi>,
        state: Arc<AppState>,
        document: Arc<dyn Document>,
        alerts: Alerts,
    ) -> Self {
        let group = match surface {
            SurfaceKind::FullText => XAPIAN_GROUP_NAME,
            _ => settings.default_group.as_str(),
        };
        let bound = match settings.layout {
            SuggestionLayout::Compact => NavBound::ListLength,
            SuggestionLayout::FixedRows => NavBound::FixedRows(settings.rows),
        };

        let mut session = SearchSession::new(group);
        session.suggestions = placeholder(settings.layout, settings.rows);

        Self {
            surface,
            settings,
            api,
            state,
            document,
            alerts,
            session,
            navigator: KeyboardNavigator::new(bound),
            clock: RequestClock::default(),
            generation: 0,
            rendered: RenderedArticle::default(),
            deep_link: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn surface(&self) -> SurfaceKind {
        self.surface
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn rendered(&self) -> &RenderedArticle {
        &self.rendered
    }

    pub fn focus(&self) -> FocusTarget {
        self.navigator.focus()
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        self.navigator.set_focus(focus);
    }

    /// Remember `?group=&key=` parameters until groups are known
    pub fn set_deep_link(&mut self, link: DeepLink) {
        if !link.is_empty() {
            self.deep_link = Some(link);
        }
    }

    /// History or suggestions, whichever the list currently shows
    pub async fn visible_list(&self) -> Vec<String> {
        if self.session.viewing_history() {
            self.state.library.read().await.history.clone()
        } else {
            self.session.suggestions.clone()
        }
    }

    pub async fn set_search_term(&mut self, term: &str) -> Option<SuggestionRequest> {
        self.session.search_term = term.to_string();
        self.navigator.sync_view(&mut self.session);
        self.suggest().await
    }

    async fn suggest(&mut self) -> Option<SuggestionRequest> {
        // Full-text search has no autocomplete
        if self.surface == SurfaceKind::FullText {
            return None;
        }

        if self.session.search_term.is_empty() {
            let timestamp = self.clock.next();
            let rows = self.suggestion_rows().await;
            self.session
                .reset_suggestions(timestamp, placeholder(self.settings.layout, rows));
            self.reset_active_dictionaries().await;
            return None;
        }

        Some(SuggestionRequest {
            group: self.session.active_group.clone(),
            term: self.session.search_term.clone(),
            timestamp: self.clock.next(),
        })
    }

    async fn suggestion_rows(&self) -> usize {
        let size = self.state.library.read().await.suggestion_size;
        usize::try_from(size)
            .ok()
            .filter(|rows| *rows > 0)
            .unwrap_or(self.settings.rows)
    }

    /// Show the dictionaries of the active group, if the grouping is known
    async fn reset_active_dictionaries(&mut self) {
        let library = self.state.library.read().await;
        if let Some(names) = library.dictionaries_in_group(&self.session.active_group) {
            self.session.active_dictionaries = names;
        }
    }

    pub fn receive_suggestions(&mut self, outcome: SuggestionOutcome) -> Option<SuggestionApply> {
        match outcome.result {
            Ok(response) => {
                let applied = self.session.accept_suggestions(response);
                if applied == SuggestionApply::Applied && !self.session.viewing_history() {
                    let len = self.session.suggestions.len();
                    self.navigator.clamp(&mut self.session, len);
                }
                Some(applied)
            }
            Err(e) => {
                self.alerts.failure("failure-fetching-suggestions", &e);
                None
            }
        }
    }

    /// Start a search for `raw`; `None` when there is nothing to search
    pub fn search(&mut self, raw: &str, anchor: Option<String>) -> Option<QueryRequest> {
        let request = QueryRequest::prepare(
            self.surface,
            &self.session.active_group,
            raw,
            anchor,
            self.generation + 1,
        )?;
        self.generation = request.generation;
        Some(request)
    }

    pub async fn receive_article(&mut self, outcome: QueryOutcome) -> QueryCommit {
        let QueryOutcome { request, result } = outcome;
        if request.generation < self.generation {
            tracing::debug!(
                "Dropping superseded article for {:?} (#{} < #{})",
                request.term,
                request.generation,
                self.generation
            );
            return QueryCommit::Superseded;
        }

        match result {
            Ok(payload) => QueryCommit::Committed(self.commit(payload, request.anchor)),
            Err(e) => {
                match self.surface {
                    SurfaceKind::FullText => self.session.fts_matches.clear(),
                    _ => self.reset_active_dictionaries().await,
                }
                self.alerts.failure("failure-fetching-articles", &e);
                QueryCommit::Failed
            }
        }
    }

    fn commit(&mut self, payload: QueryPayload, anchor: Option<String>) -> Vec<Followup> {
        let (articles, dictionaries, matches) = match payload {
            QueryPayload::Articles(response) => {
                if !response.found {
                    tracing::debug!("No entry found, showing alternatives");
                }
                (response.articles, Some(response.dictionaries), None)
            }
            QueryPayload::FullText(response) => (response.articles, None, Some(response.dictionaries)),
        };

        let html = activate(self.document.as_ref(), articles);
        self.document.render_article(&html);
        self.rendered = render(&html);
        self.session.article = html;
        if let Some(dictionaries) = dictionaries {
            self.session.active_dictionaries = dictionaries;
        }
        if let Some(matches) = matches {
            self.session.fts_matches = matches;
        }

        let mut followups = Vec::new();
        if self.surface.refreshes_history() {
            followups.push(Followup::RefreshHistory);
        }
        if self.surface.scrolls_to_top() {
            self.document.scroll_to_top();
        } else if let Some(anchor) = anchor.filter(|a| !a.is_empty()) {
            followups.push(Followup::ScrollToAnchor(anchor));
        }
        followups
    }

    /// Background work for a followup; resolves early once the controller is dropped
    pub fn followup_task(&self, followup: Followup) -> Task {
        match followup {
            Followup::RefreshHistory => Box::pin(self.refresh_history()),
            Followup::ScrollToAnchor(anchor) => Box::pin(self.scroll_to_anchor(anchor)),
        }
    }

    fn refresh_history(&self) -> impl Future<Output = bool> + Send + 'static {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();

        async move {
            tokio::select! {
                result = api.history() => match result {
                    Ok(history) => {
                        state.library.write().await.history = history;
                        true
                    }
                    Err(e) => {
                        tracing::warn!("Failed to refresh history: {}", e);
                        false
                    }
                },
                _ = cancel.cancelled() => false,
            }
        }
    }

    fn scroll_to_anchor(&self, anchor: String) -> impl Future<Output = bool> + Send + 'static {
        let document = Arc::clone(&self.document);
        let cancel = self.cancel.clone();
        let timeout = self.settings.anchor_wait;

        async move {
            match wait_for_element(document.as_ref(), &anchor, timeout, &cancel).await {
                WaitOutcome::Found => {
                    document.scroll_into_view(&anchor);
                    true
                }
                outcome => {
                    tracing::debug!("Not scrolling to {}: {:?}", anchor, outcome);
                    false
                }
            }
        }
    }

    /// Scroll to an element already in the article, e.g. a dictionary or FTS match
    pub fn jump_to(&self, anchor: &str) -> bool {
        if self.document.has_element(anchor) {
            self.document.scroll_into_view(anchor);
            true
        } else {
            false
        }
    }

    /// Jump to the `index`th full-text match
    pub fn jump_to_match(&self, index: usize) -> bool {
        self.session
            .fts_matches
            .get(index)
            .is_some_and(|m| self.jump_to(&m.anchor_name()))
    }

    pub async fn on_key(&mut self, key: NavKey) -> Option<QueryRequest> {
        if self.surface == SurfaceKind::FullText {
            if key != NavKey::Enter || self.navigator.focus() != FocusTarget::SearchInput {
                return None;
            }
            let term = self.session.search_term.clone();
            return self.search(&term, None);
        }

        let list = self.visible_list().await;
        match self.navigator.on_key(&mut self.session, &list, key) {
            NavAction::Search(item) => self.search(&item, None),
            NavAction::None => None,
        }
    }

    pub async fn on_list_item(&mut self, index: usize) -> Option<QueryRequest> {
        let list = self.visible_list().await;
        match self.navigator.on_item_click(&mut self.session, &list, index) {
            NavAction::Search(item) => self.search(&item, None),
            NavAction::None => None,
        }
    }

    /// Click at a character offset of the rendered article
    pub fn on_article_click(&mut self, offset: usize) -> ArticleAction {
        let click = ArticleView::new(self.surface, &self.settings.api_prefix, &self.rendered)
            .click(offset);
        self.article_action(click)
    }

    /// Click on an `href` inside the article
    pub fn follow_link(&mut self, href: &str) -> ArticleAction {
        let click = ArticleView::new(self.surface, &self.settings.api_prefix, &self.rendered)
            .follow_link(href);
        self.article_action(click)
    }

    fn article_action(&mut self, click: ArticleClick) -> ArticleAction {
        match click {
            ArticleClick::Search { term, anchor } => self
                .search(&term, anchor)
                .map_or(ArticleAction::None, ArticleAction::Dispatch),
            ArticleClick::OpenInNewTab(target) => ArticleAction::OpenInNewTab(target),
            ArticleClick::Ignored => ArticleAction::None,
        }
    }

    /// Switch group, then refresh suggestions and the article for the current term
    pub async fn select_group(&mut self, group: &str) -> Requests {
        if self.surface == SurfaceKind::FullText || group == self.session.active_group {
            return Requests::default();
        }
        if !self.state.library.read().await.has_group(group) {
            tracing::warn!("Ignoring unknown group {}", group);
            return Requests::default();
        }

        tracing::debug!("Switching to group {}", group);
        self.session.active_group = group.to_string();
        let suggestions = self.suggest().await;
        let term = self.session.search_term.clone();
        Requests {
            suggestions,
            query: self.search(&term, None),
        }
    }

    /// Re-derive everything that depends on the library after it changed
    pub async fn library_changed(&mut self) -> Requests {
        let mut group_reset = false;
        {
            let library = self.state.library.read().await;
            if self.settings.layout == SuggestionLayout::FixedRows {
                if let Ok(rows) = usize::try_from(library.suggestion_size) {
                    self.navigator.set_bound(NavBound::FixedRows(rows.max(1)));
                }
            }
            if self.surface != SurfaceKind::FullText
                && !library.groups.is_empty()
                && !library.has_group(&self.session.active_group)
            {
                tracing::info!(
                    "Group {} is gone, falling back to {}",
                    self.session.active_group,
                    DEFAULT_GROUP_NAME
                );
                self.session.active_group = DEFAULT_GROUP_NAME.to_string();
                group_reset = true;
            }
        }

        if let Some(requests) = self.process_deep_link().await {
            return requests;
        }

        let suggestions = self.suggest().await;
        let query = if group_reset {
            let term = self.session.search_term.clone();
            self.search(&term, None)
        } else {
            None
        };
        Requests { suggestions, query }
    }

    async fn process_deep_link(&mut self) -> Option<Requests> {
        if self.state.library.read().await.groups.is_empty() {
            return None;
        }
        let link = self.deep_link.take()?;
        tracing::info!("Opening deep link {}", link.to_query());

        if let Some(group) = link.group.filter(|_| self.surface != SurfaceKind::FullText) {
            if self.state.library.read().await.has_group(&group) {
                self.session.active_group = group;
            } else {
                tracing::warn!("Deep link names unknown group {}", group);
            }
        }

        let term = link.key.unwrap_or_else(|| self.session.search_term.clone());
        let suggestions = self.set_search_term(&term).await;
        Some(Requests {
            suggestions,
            query: self.search(&term, None),
        })
    }

    /// Keep the selection in range after the history list changed
    pub async fn history_updated(&mut self) {
        if self.session.viewing_history() {
            let len = self.state.library.read().await.history.len();
            self.navigator.clamp(&mut self.session, len);
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
