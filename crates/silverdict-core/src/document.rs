use std::collections::HashSet;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use regex::Regex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

static ELEMENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<[a-z][^>]*?\b(?:id|name)\s*=\s*["']([^"']+)["']"#).expect("name pattern")
});

/// The page an article is injected into
pub trait Document: Send + Sync {
    fn render_article(&self, html: &str);

    /// Remove every script element added by [`Document::append_script`]
    fn remove_injected_scripts(&self);

    /// Add a script element; the page fetches and runs it
    fn append_script(&self, src: &str);

    fn injected_scripts(&self) -> Vec<String>;

    /// Whether an element with this id or name currently exists
    fn has_element(&self, name: &str) -> bool;

    fn scroll_into_view(&self, name: &str);

    fn scroll_to_top(&self);

    /// Revision counter bumped on every mutation
    fn observe(&self) -> watch::Receiver<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Found,
    TimedOut,
    Cancelled,
    /// The document went away while waiting
    Detached,
}

/// Wait until `name` exists in `document`, re-checking on every mutation
pub async fn wait_for_element<D>(
    document: &D,
    name: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> WaitOutcome
where
    D: Document + ?Sized,
{
    let mut changes = document.observe();

    let wait = async {
        loop {
            if document.has_element(name) {
                return WaitOutcome::Found;
            }
            if changes.changed().await.is_err() {
                return WaitOutcome::Detached;
            }
        }
    };

    tokio::select! {
        outcome = tokio::time::timeout(timeout, wait) => outcome.unwrap_or(WaitOutcome::TimedOut),
        _ = cancel.cancelled() => WaitOutcome::Cancelled,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollPosition {
    Top,
    Element(String),
}

#[derive(Debug, Default)]
struct DocumentState {
    article: String,
    element_names: HashSet<String>,
    scripts: Vec<String>,
    scroll: Option<ScrollPosition>,
}

/// Headless document that keeps the injected article in memory
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
    revisions: watch::Sender<u64>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        let (revisions, _) = watch::channel(0);
        Self {
            state: Mutex::new(DocumentState::default()),
            revisions,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revisions.send_modify(|revision| *revision += 1);
    }

    pub fn article(&self) -> String {
        self.lock().article.clone()
    }

    pub fn scroll_position(&self) -> Option<ScrollPosition> {
        self.lock().scroll.clone()
    }

    /// Add an element outside of article rendering, e.g. from a script
    pub fn insert_element(&self, name: &str) {
        self.lock().element_names.insert(name.to_string());
        self.bump();
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn render_article(&self, html: &str) {
        {
            let mut state = self.lock();
            state.article = html.to_string();
            state.element_names = ELEMENT_NAME
                .captures_iter(html)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect();
        }
        self.bump();
    }

    fn remove_injected_scripts(&self) {
        self.lock().scripts.clear();
        self.bump();
    }

    fn append_script(&self, src: &str) {
        self.lock().scripts.push(src.to_string());
        self.bump();
    }

    fn injected_scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    fn has_element(&self, name: &str) -> bool {
        self.lock().element_names.contains(name)
    }

    fn scroll_into_view(&self, name: &str) {
        self.lock().scroll = Some(ScrollPosition::Element(name.to_string()));
    }

    fn scroll_to_top(&self) {
        self.lock().scroll = Some(ScrollPosition::Top);
    }

    fn observe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn rendering_indexes_ids_and_names() {
        let document = MemoryDocument::new();
        document.render_article(
            r#"<div id="oald"><a name="oald__apple">apple</a></div><p class="x">plain</p>"#,
        );
        assert!(document.has_element("oald"));
        assert!(document.has_element("oald__apple"));
        assert!(!document.has_element("x"));
    }

    #[tokio::test]
    async fn wait_finds_existing_element_immediately() {
        let document = MemoryDocument::new();
        document.render_article(r#"<div id="webster"></div>"#);
        let outcome = wait_for_element(
            &document,
            "webster",
            Duration::from_millis(10),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome, WaitOutcome::Found);
    }

    #[tokio::test]
    async fn wait_wakes_up_on_mutation() {
        let document = Arc::new(MemoryDocument::new());
        let writer = Arc::clone(&document);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            writer.insert_element("late");
        });

        let outcome = wait_for_element(
            document.as_ref(),
            "late",
            Duration::from_secs(2),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome, WaitOutcome::Found);
    }

    #[tokio::test]
    async fn wait_is_bounded() {
        let document = MemoryDocument::new();
        let outcome = wait_for_element(
            &document,
            "never",
            Duration::from_millis(20),
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test]
    async fn wait_can_be_cancelled() {
        let document = MemoryDocument::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome =
            wait_for_element(&document, "never", Duration::from_secs(5), &cancel).await;
        assert_eq!(outcome, WaitOutcome::Cancelled);
    }
}
