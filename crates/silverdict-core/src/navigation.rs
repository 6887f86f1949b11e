use silverdict_types::{FocusTarget, NavKey};

use crate::session::SearchSession;

/// How far ArrowDown may move the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBound {
    /// Up to the last item of the list on screen
    ListLength,
    /// Up to a fixed number of rows, whether or not they are filled yet
    FixedRows(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    None,
    Search(String),
}

/// Arrow keys and Enter over the history or suggestion list
#[derive(Debug, Clone)]
pub struct KeyboardNavigator {
    bound: NavBound,
    focus: FocusTarget,
    viewing_history: bool,
}

impl KeyboardNavigator {
    pub fn new(bound: NavBound) -> Self {
        Self {
            bound,
            focus: FocusTarget::SearchInput,
            viewing_history: true,
        }
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        self.focus = focus;
    }

    pub fn set_bound(&mut self, bound: NavBound) {
        self.bound = bound;
    }

    /// Call after every search term change
    pub fn sync_view(&mut self, session: &mut SearchSession) {
        let viewing_history = session.viewing_history();
        if viewing_history && !self.viewing_history {
            session.selected_index = 0;
        }
        self.viewing_history = viewing_history;
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&self, session: &mut SearchSession, len: usize) {
        if session.selected_index >= len {
            session.selected_index = len.saturating_sub(1);
        }
    }

    pub fn on_key(&mut self, session: &mut SearchSession, list: &[String], key: NavKey) -> NavAction {
        if self.focus != FocusTarget::SearchInput {
            return NavAction::None;
        }

        match key {
            NavKey::ArrowDown => {
                let limit = match self.bound {
                    NavBound::ListLength => list.len(),
                    NavBound::FixedRows(rows) => rows,
                };
                if session.selected_index + 1 < limit {
                    session.selected_index += 1;
                }
                NavAction::None
            }
            NavKey::ArrowUp => {
                session.selected_index = session.selected_index.saturating_sub(1);
                NavAction::None
            }
            NavKey::Enter => {
                let action = match list.get(session.selected_index) {
                    Some(item) if !item.is_empty() => NavAction::Search(item.clone()),
                    _ => NavAction::None,
                };
                if session.viewing_history() {
                    session.selected_index = 0;
                }
                action
            }
            NavKey::Other => NavAction::None,
        }
    }

    /// Mouse selection of a list row
    pub fn on_item_click(
        &mut self,
        session: &mut SearchSession,
        list: &[String],
        index: usize,
    ) -> NavAction {
        let Some(item) = list.get(index).filter(|item| !item.is_empty()) else {
            return NavAction::None;
        };
        session.selected_index = if session.viewing_history() { 0 } else { index };
        NavAction::Search(item.clone())
    }
}
