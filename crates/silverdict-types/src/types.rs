use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigChanged,
    UiEvent(UiEvent),
    Shutdown,
}

/// Input coming from whatever front-end drives a search screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Contents of the search input changed
    SearchTermChanged(String),
    /// Explicit search, e.g. a clicked suggestion or an intercepted link
    SearchText {
        term: String,
        anchor: Option<String>,
    },
    Key(NavKey),
    Focus(FocusTarget),
    SelectGroup(String),
    SelectListItem(usize),
    /// Click inside the rendered article, at a character offset of its text
    ClickArticle { offset: usize },
    /// Click on an anchor inside the rendered article
    FollowLink { href: String },
    /// Scroll to an element already in the article, e.g. a dictionary section
    JumpTo(String),
    /// Scroll to the n-th full-text match
    JumpToMatch(usize),
    SwitchSurface(SurfaceKind),
    ClearHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    SearchInput,
    Article,
    Elsewhere,
}

/// The three screens that share the search session machinery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Query,
    Anki,
    #[serde(rename = "fts")]
    FullText,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceKind::Query => "query",
            SurfaceKind::Anki => "anki",
            SurfaceKind::FullText => "fts",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSurface(pub String);

impl fmt::Display for UnknownSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search surface '{}'", self.0)
    }
}

impl std::error::Error for UnknownSurface {}

impl FromStr for SurfaceKind {
    type Err = UnknownSurface;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query" => Ok(SurfaceKind::Query),
            "anki" => Ok(SurfaceKind::Anki),
            "fts" | "fulltext" | "full-text" => Ok(SurfaceKind::FullText),
            other => Err(UnknownSurface(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_names_parse_back() {
        for surface in [SurfaceKind::Query, SurfaceKind::Anki, SurfaceKind::FullText] {
            assert_eq!(surface.to_string().parse::<SurfaceKind>(), Ok(surface));
        }
        assert!("xapian".parse::<SurfaceKind>().is_err());
    }
}
