use silverdict_core::testing::Backend;
use silverdict_types::{AppEvent, SurfaceKind, UiEvent};

use super::{TestApp, next_completion};
use crate::events::completion::handle_completion;
use crate::events::{Completion, handle_events};
use crate::ui::{Frame, Renderer};

fn ui(event: UiEvent) -> AppEvent {
    AppEvent::UiEvent(event)
}

fn search(term: &str) -> AppEvent {
    ui(UiEvent::SearchText {
        term: term.into(),
        anchor: None,
    })
}

#[tokio::test]
async fn typing_fetches_suggestions() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, done_rx) = app.screen(SurfaceKind::Query);

    let running = handle_events(&mut screen, ui(UiEvent::SearchTermChanged("app".into())))
        .await
        .unwrap();
    assert!(running);

    let done = next_completion(&done_rx).await;
    assert!(matches!(done, Completion::Suggestions(_)));
    handle_completion(&mut screen, done).await;
    assert_eq!(screen.controller.session().suggestions, vec!["appa", "appb"]);
}

#[tokio::test]
async fn lookup_refreshes_history_afterwards() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, done_rx) = app.screen(SurfaceKind::Query);

    handle_events(&mut screen, search("apple")).await.unwrap();
    let done = next_completion(&done_rx).await;
    assert!(matches!(done, Completion::Article(_)));
    handle_completion(&mut screen, done).await;

    assert!(screen.document.article().contains("apple"));
    assert_eq!(screen.controller.session().active_dictionaries, vec!["oald"]);

    let done = next_completion(&done_rx).await;
    assert!(matches!(done, Completion::HistoryRefreshed));
    handle_completion(&mut screen, done).await;
    assert_eq!(screen.services.state.library.read().await.history, vec!["apple"]);
}

#[tokio::test]
async fn failed_history_refresh_is_not_reported() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, done_rx) = app.screen(SurfaceKind::Query);

    handle_events(&mut screen, search("apple")).await.unwrap();
    let done = next_completion(&done_rx).await;
    app.api.fail(true);
    handle_completion(&mut screen, done).await;
    assert!(screen.document.article().contains("apple"));

    let waited = tokio::time::timeout(std::time::Duration::from_millis(300), done_rx.recv()).await;
    assert!(waited.is_err(), "no completion expected, got {waited:?}");
    assert!(screen.services.state.library.read().await.history.is_empty());
}

#[tokio::test]
async fn clearing_history_goes_through_the_backend() {
    let backend = Backend {
        history: vec!["apple".into(), "pear".into()],
        ..Backend::default()
    };
    let app = TestApp::new(backend).await;
    let (mut screen, _done_rx) = app.screen(SurfaceKind::Query);
    assert_eq!(screen.controller.visible_list().await.len(), 2);

    handle_events(&mut screen, ui(UiEvent::ClearHistory)).await.unwrap();

    assert!(screen.services.state.library.read().await.history.is_empty());
    assert!(app.api.calls().contains(&"clear_history".to_string()));
    assert!(app.notifier.messages().is_empty());
}

#[tokio::test]
async fn failed_clear_raises_an_alert() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, _done_rx) = app.screen(SurfaceKind::Query);
    app.api.fail(true);

    handle_events(&mut screen, ui(UiEvent::ClearHistory)).await.unwrap();

    let messages = app.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("HTTP 500: backend down"));
}

#[tokio::test]
async fn full_text_matches_can_be_jumped_to() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, done_rx) = app.screen(SurfaceKind::Query);

    handle_events(&mut screen, ui(UiEvent::SwitchSurface(SurfaceKind::FullText)))
        .await
        .unwrap();
    assert_eq!(screen.controller.surface(), SurfaceKind::FullText);

    handle_events(&mut screen, search("fox")).await.unwrap();
    let done = next_completion(&done_rx).await;
    handle_completion(&mut screen, done).await;
    assert_eq!(screen.controller.session().fts_matches.len(), 1);

    handle_events(&mut screen, ui(UiEvent::JumpToMatch(0))).await.unwrap();
    assert!(screen.notice.is_none());

    handle_events(&mut screen, ui(UiEvent::JumpToMatch(4))).await.unwrap();
    assert_eq!(screen.notice.as_deref(), Some("No match [4]"));
}

#[tokio::test]
async fn missing_anchor_becomes_a_notice() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, _done_rx) = app.screen(SurfaceKind::Query);

    handle_events(&mut screen, ui(UiEvent::JumpTo("nowhere".into())))
        .await
        .unwrap();
    assert_eq!(screen.notice.as_deref(), Some("No #nowhere in this article"));
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, _done_rx) = app.screen(SurfaceKind::Query);
    assert!(!handle_events(&mut screen, AppEvent::Shutdown).await.unwrap());
}

#[tokio::test]
async fn frame_shows_term_list_and_article() {
    let app = TestApp::new(Backend::default()).await;
    let (mut screen, done_rx) = app.screen(SurfaceKind::Query);
    let renderer = Renderer::plain(Default::default());

    let list = screen.controller.visible_list().await;
    let empty = renderer.draw(&Frame {
        controller: &screen.controller,
        list: &list,
        scroll: None,
        notice: None,
    });
    assert!(empty.starts_with("[query] Default Group\n> Search\n"));

    handle_events(&mut screen, ui(UiEvent::SearchTermChanged("app".into())))
        .await
        .unwrap();
    let done = next_completion(&done_rx).await;
    handle_completion(&mut screen, done).await;
    handle_events(&mut screen, search("apple")).await.unwrap();
    let done = next_completion(&done_rx).await;
    handle_completion(&mut screen, done).await;

    let list = screen.controller.visible_list().await;
    let frame = renderer.draw(&Frame {
        controller: &screen.controller,
        list: &list,
        scroll: None,
        notice: Some("hello"),
    });
    assert!(frame.contains("> app\n"));
    assert!(frame.contains("* appa\n  appb\n"));
    assert!(frame.contains("oald\n----\n"));
    assert!(frame.contains("apple"));
    assert!(frame.ends_with("hello\n"));
}
