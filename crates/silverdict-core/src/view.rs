use silverdict_types::{SurfaceKind, XAPIAN_GROUP_NAME};

use crate::links::{DeepLink, parse_query_link};
use crate::render::RenderedArticle;
use crate::selection::{TextSelection, intercepts_click, on_article_click};

/// What a click inside the article container asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleClick {
    /// Search in this screen
    Search { term: String, anchor: Option<String> },
    /// Open a search page elsewhere, given as a query string
    OpenInNewTab(String),
    /// Nothing for us; default behaviour applies
    Ignored,
}

/// Click handling scoped to one article container
pub struct ArticleView<'a> {
    surface: SurfaceKind,
    api_prefix: &'a str,
    rendered: &'a RenderedArticle,
}

impl<'a> ArticleView<'a> {
    pub fn new(surface: SurfaceKind, api_prefix: &'a str, rendered: &'a RenderedArticle) -> Self {
        Self {
            surface,
            api_prefix,
            rendered,
        }
    }

    /// Click at a character offset of the rendered text
    pub fn click(&self, offset: usize) -> ArticleClick {
        if let Some(link) = self.rendered.link_at(offset) {
            return self.follow_link(&link.href);
        }

        let path = self.rendered.elements_at(offset);
        if intercepts_click(&path) {
            return ArticleClick::Ignored;
        }

        match on_article_click(&path, &self.rendered.text, TextSelection::caret(offset)) {
            Some(word) => self.word_selected(word),
            None => ArticleClick::Ignored,
        }
    }

    /// Click on an anchor; only links into the query endpoint are intercepted
    pub fn follow_link(&self, href: &str) -> ArticleClick {
        let Some(link) = parse_query_link(href, self.api_prefix) else {
            return ArticleClick::Ignored;
        };

        match self.surface {
            SurfaceKind::Query | SurfaceKind::Anki => ArticleClick::Search {
                term: link.term,
                anchor: link.anchor,
            },
            SurfaceKind::FullText => ArticleClick::OpenInNewTab(
                DeepLink {
                    group: Some(XAPIAN_GROUP_NAME.to_string()),
                    key: Some(link.term),
                }
                .to_query(),
            ),
        }
    }

    fn word_selected(&self, word: String) -> ArticleClick {
        match self.surface {
            SurfaceKind::Query | SurfaceKind::Anki => ArticleClick::Search {
                term: word,
                anchor: None,
            },
            SurfaceKind::FullText => ArticleClick::OpenInNewTab(format!(
                "/{}",
                DeepLink {
                    group: None,
                    key: Some(word),
                }
                .to_query()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;

    const ARTICLE: &str = r#"<p>the quick-fox, see <a href="/api/query/Default%20Group/vixen#oald">vixen</a>
<span onclick="play()">listen</span> <a href="https://example.org">web</a></p>"#;

    #[test]
    fn word_click_searches_in_query_screen() {
        let rendered = render(ARTICLE);
        let view = ArticleView::new(SurfaceKind::Query, "/api", &rendered);
        assert_eq!(
            view.click(6),
            ArticleClick::Search {
                term: "quick".into(),
                anchor: None
            }
        );
    }

    #[test]
    fn query_link_is_intercepted() {
        let rendered = render(ARTICLE);
        let offset = rendered.text.find("vixen").unwrap() + 1;
        let view = ArticleView::new(SurfaceKind::Anki, "/api", &rendered);
        assert_eq!(
            view.click(offset),
            ArticleClick::Search {
                term: "vixen".into(),
                anchor: Some("oald".into())
            }
        );
    }

    #[test]
    fn full_text_screen_opens_new_tabs() {
        let rendered = render(ARTICLE);
        let view = ArticleView::new(SurfaceKind::FullText, "/api", &rendered);
        let offset = rendered.text.find("vixen").unwrap() + 1;
        assert_eq!(
            view.click(offset),
            ArticleClick::OpenInNewTab("?group=Xapian&key=vixen".into())
        );
        assert_eq!(view.click(1), ArticleClick::OpenInNewTab("/?key=the".into()));
    }

    #[test]
    fn handlers_and_foreign_links_are_left_alone() {
        let rendered = render(ARTICLE);
        let view = ArticleView::new(SurfaceKind::Query, "/api", &rendered);
        let listen = rendered.text.find("listen").unwrap() + 2;
        let web = rendered.text.find("web").unwrap() + 1;
        assert_eq!(view.click(listen), ArticleClick::Ignored);
        assert_eq!(view.click(web), ArticleClick::Ignored);
    }
}
