//! Injected markup does not run its `<script>` tags, so every script source
//! an article references is re-added as a fresh script element.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;

static SCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script\b[^>]*?\bsrc\s*=\s*["']([^"']*)["']"#).expect("script pattern")
});

/// `src` of every script tag in `html`, in document order
pub fn script_sources(html: &str) -> Vec<String> {
    SCRIPT_SRC
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replace previously injected scripts with the ones `html` references.
/// Returns `html` untouched.
pub fn activate<D>(document: &D, html: String) -> String
where
    D: Document + ?Sized,
{
    document.remove_injected_scripts();

    let sources = script_sources(&html);
    if !sources.is_empty() {
        tracing::debug!("Activating {} article scripts", sources.len());
    }
    for src in &sources {
        document.append_script(src);
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;

    const ARTICLE: &str = r#"<div id="oald">apple</div>
<SCRIPT type="text/javascript" src="/api/cache/oald/oald.js"></SCRIPT>
<script src='/api/cache/oald/audio.js'></script>
<script>inline()</script>"#;

    #[test]
    fn extracts_sources_case_insensitively() {
        assert_eq!(
            script_sources(ARTICLE),
            vec!["/api/cache/oald/oald.js", "/api/cache/oald/audio.js"]
        );
    }

    #[test]
    fn other_tags_after_inline_script_are_not_scripts() {
        let html = r#"<script>play()</script><img src="/api/cache/oald/pic.png"><audio src='/a.mp3'>"#;
        assert!(script_sources(html).is_empty());

        let html = r#"<script>play()</script><script defer src="/api/cache/oald/x.js"></script>"#;
        assert_eq!(script_sources(html), vec!["/api/cache/oald/x.js"]);
    }

    #[test]
    fn html_passes_through() {
        let document = MemoryDocument::new();
        assert_eq!(activate(&document, ARTICLE.to_string()), ARTICLE);
    }

    #[test]
    fn second_activation_replaces_first() {
        let document = MemoryDocument::new();
        activate(&document, ARTICLE.to_string());
        activate(&document, ARTICLE.to_string());
        assert_eq!(
            document.injected_scripts(),
            vec!["/api/cache/oald/oald.js", "/api/cache/oald/audio.js"]
        );

        activate(&document, "<p>no scripts</p>".to_string());
        assert!(document.injected_scripts().is_empty());
    }
}
