use silverdict_types::{AppEvent, FocusTarget, NavKey, SurfaceKind, UiEvent};

use crate::io::parse_line;

fn ui(line: &str) -> UiEvent {
    match parse_line(line) {
        Ok(Some(AppEvent::UiEvent(event))) => event,
        other => panic!("{line:?} parsed to {other:?}"),
    }
}

#[test]
fn plain_text_replaces_the_term() {
    assert_eq!(ui("apple pie"), UiEvent::SearchTermChanged("apple pie".into()));
    assert_eq!(ui("apple\r\n"), UiEvent::SearchTermChanged("apple".into()));
    assert_eq!(ui(""), UiEvent::SearchTermChanged(String::new()));
}

#[test]
fn navigation_commands() {
    assert_eq!(ui(":up"), UiEvent::Key(NavKey::ArrowUp));
    assert_eq!(ui(":down"), UiEvent::Key(NavKey::ArrowDown));
    assert_eq!(ui(":enter"), UiEvent::Key(NavKey::Enter));
    assert_eq!(ui(":pick 3"), UiEvent::SelectListItem(3));
    assert_eq!(ui(":focus article"), UiEvent::Focus(FocusTarget::Article));
    assert_eq!(ui(":focus"), UiEvent::Focus(FocusTarget::SearchInput));
}

#[test]
fn search_with_anchor() {
    assert_eq!(
        ui(":search hello#oald"),
        UiEvent::SearchText {
            term: "hello".into(),
            anchor: Some("oald".into()),
        }
    );
    assert_eq!(
        ui(":search hello world"),
        UiEvent::SearchText {
            term: "hello world".into(),
            anchor: None,
        }
    );
}

#[test]
fn surface_and_group() {
    assert_eq!(ui(":surface fts"), UiEvent::SwitchSurface(SurfaceKind::FullText));
    assert_eq!(ui(":group English"), UiEvent::SelectGroup("English".into()));
    assert!(parse_line(":surface dictionary").is_err());
}

#[test]
fn lifecycle_and_errors() {
    assert!(matches!(parse_line(":q"), Ok(Some(AppEvent::Shutdown))));
    assert!(matches!(parse_line(":reload"), Ok(Some(AppEvent::ConfigChanged))));
    assert!(matches!(parse_line(":"), Ok(None)));
    assert!(parse_line(":pick two").is_err());
    assert!(parse_line(":search").is_err());
    assert!(parse_line(":frobnicate").is_err());
}
