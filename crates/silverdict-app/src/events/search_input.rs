use silverdict_core::controller::ArticleAction;
use silverdict_types::UiEvent;

use crate::events::Screen;

pub async fn handle_search_input(screen: &mut Screen, event: UiEvent) {
    match event {
        UiEvent::SearchTermChanged(term) => {
            if let Some(request) = screen.controller.set_search_term(&term).await {
                screen.spawn_suggestions(request);
            }
        }
        UiEvent::SearchText { term, anchor } => {
            if let Some(request) = screen.controller.search(&term, anchor) {
                screen.spawn_query(request);
            }
        }
        UiEvent::Key(key) => {
            if let Some(request) = screen.controller.on_key(key).await {
                screen.spawn_query(request);
            }
        }
        UiEvent::Focus(focus) => screen.controller.set_focus(focus),
        UiEvent::SelectGroup(group) => {
            let requests = screen.controller.select_group(&group).await;
            screen.dispatch(requests);
        }
        UiEvent::SelectListItem(index) => {
            if let Some(request) = screen.controller.on_list_item(index).await {
                screen.spawn_query(request);
            }
        }
        UiEvent::ClickArticle { offset } => {
            let action = screen.controller.on_article_click(offset);
            handle_article_action(screen, action);
        }
        UiEvent::FollowLink { href } => {
            let action = screen.controller.follow_link(&href);
            handle_article_action(screen, action);
        }
        UiEvent::JumpTo(anchor) => {
            if !screen.controller.jump_to(&anchor) {
                screen.notice = Some(format!("No #{anchor} in this article"));
            }
        }
        UiEvent::JumpToMatch(index) => {
            if !screen.controller.jump_to_match(index) {
                screen.notice = Some(format!("No match [{index}]"));
            }
        }
        UiEvent::SwitchSurface(surface) => {
            screen.switch_surface(surface);
            let requests = screen.controller.library_changed().await;
            screen.dispatch(requests);
        }
        // Routed to the library handlers before reaching here
        UiEvent::ClearHistory => {}
    }
}

fn handle_article_action(screen: &mut Screen, action: ArticleAction) {
    match action {
        ArticleAction::Dispatch(request) => screen.spawn_query(request),
        ArticleAction::OpenInNewTab(target) => {
            tracing::info!("Opening {} outside the client", target);
            screen.notice = Some(format!("Open in a new tab: {target}"));
        }
        ArticleAction::None => {}
    }
}
