//! Flattening of article HTML into the plain text a terminal can show,
//! keeping track of which character ranges belong to links and to elements
//! with their own click handlers.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::selection::ElementInfo;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9-]*)([^>]*)>").expect("tag pattern")
});
static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).expect("href pattern")
});
static ONCLICK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bonclick\s*=").expect("onclick pattern"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws pattern"));

const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "hr", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "section", "blockquote",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    /// Character range in [`RenderedArticle::text`]
    pub range: Range<usize>,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedArticle {
    pub text: String,
    pub links: Vec<LinkSpan>,
    /// Ranges covered by elements carrying an `onclick` handler
    pub handlers: Vec<Range<usize>>,
}

impl RenderedArticle {
    pub fn link_at(&self, offset: usize) -> Option<&LinkSpan> {
        self.links.iter().find(|l| l.range.contains(&offset))
    }

    /// Elements enclosing `offset`, innermost first
    pub fn elements_at(&self, offset: usize) -> Vec<ElementInfo> {
        let mut path: Vec<(usize, ElementInfo)> = Vec::new();
        for link in self.links.iter().filter(|l| l.range.contains(&offset)) {
            path.push((link.range.len(), ElementInfo::new("a", false)));
        }
        for range in self.handlers.iter().filter(|r| r.contains(&offset)) {
            path.push((range.len(), ElementInfo::new("span", true)));
        }
        path.sort_by_key(|(len, _)| *len);
        path.into_iter().map(|(_, element)| element).collect()
    }
}

pub fn render(html: &str) -> RenderedArticle {
    let mut out = RenderedArticle::default();
    let mut len = 0usize;
    let mut skipping: Option<String> = None;
    let mut open_link: Option<(usize, String)> = None;
    let mut open_handlers: Vec<(String, usize)> = Vec::new();
    let mut cursor = 0;

    for caps in TAG.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };

        if skipping.is_none() {
            push_text(&mut out.text, &mut len, &html[cursor..whole.start()]);
        }
        cursor = whole.end();

        let Some(name) = caps.get(2) else { continue };
        let name = name.as_str().to_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let attrs = caps.get(3).map_or("", |m| m.as_str());

        if let Some(skipped) = &skipping {
            if closing && *skipped == name {
                skipping = None;
            }
            continue;
        }

        if !closing && (name == "script" || name == "style") {
            skipping = Some(name);
            continue;
        }

        if BLOCK_TAGS.contains(&name.as_str()) && (name == "br" || !out.text.ends_with('\n')) {
            if !out.text.is_empty() {
                out.text.push('\n');
                len += 1;
            }
        }

        if closing {
            if name == "a" {
                if let Some((start, href)) = open_link.take() {
                    out.links.push(LinkSpan {
                        range: start..len,
                        href,
                    });
                }
            }
            if let Some(pos) = open_handlers.iter().rposition(|(tag, _)| *tag == name) {
                let (_, start) = open_handlers.remove(pos);
                out.handlers.push(start..len);
            }
            continue;
        }

        let self_closing = attrs.trim_end().ends_with('/');
        if name == "a" {
            if let Some(href) = HREF.captures(attrs).and_then(|c| c.get(1)) {
                open_link = Some((len, decode_entities(href.as_str())));
            }
        }
        if ONCLICK.is_match(attrs) && !self_closing {
            open_handlers.push((name, len));
        }
    }

    if skipping.is_none() {
        push_text(&mut out.text, &mut len, &html[cursor..]);
    }
    out
}

fn push_text(text: &mut String, len: &mut usize, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let mut decoded = decode_entities(&collapsed);
    if text.is_empty() || text.ends_with('\n') {
        decoded = decoded.trim_start().to_string();
    }
    *len += decoded.chars().count();
    text.push_str(&decoded);
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16)
                        .ok()
                        .and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
