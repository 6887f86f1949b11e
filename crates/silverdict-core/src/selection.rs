//! Click-to-search: grow a caret or partial selection to the whole word.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static LETTERS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}*$").expect("letters pattern"));

/// One element on the way from a click target up to the article container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub tag: String,
    pub has_click_handler: bool,
}

impl ElementInfo {
    pub fn new(tag: &str, has_click_handler: bool) -> Self {
        Self {
            tag: tag.to_string(),
            has_click_handler,
        }
    }
}

/// Selection inside a single text node, as character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub start: usize,
    pub end: usize,
}

impl TextSelection {
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

/// Whether something on the click path handles the click itself
pub fn intercepts_click(path: &[ElementInfo]) -> bool {
    path.iter()
        .any(|element| element.has_click_handler || element.tag.eq_ignore_ascii_case("a"))
}

/// Word under `selection` in `text`, or `None` when there is none
pub fn expand_to_word(text: &str, selection: TextSelection) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut start = selection.start.min(len);
    let mut end = selection.end.min(len);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let slice = |s: usize, e: usize| chars[s..e].iter().collect::<String>();
    let letters_only = |s: usize, e: usize| LETTERS_ONLY.is_match(&slice(s, e));

    // A drag selection may pick up punctuation around or inside the word
    while start < end && !letters_only(start, start + 1) {
        start += 1;
    }
    while start < end && !letters_only(end - 1, end) {
        end -= 1;
    }
    while !letters_only(start, end) {
        end -= 1;
    }

    while start > 0 && letters_only(start - 1, end) {
        start -= 1;
    }
    while end < len && letters_only(start, end + 1) {
        end += 1;
    }

    let word: String = slice(start, end).trim().nfc().collect();
    if word.is_empty() { None } else { Some(word) }
}

/// Handle a click in the article: leave intercepting elements alone,
/// otherwise return the word under the selection
pub fn on_article_click(
    path: &[ElementInfo],
    text: &str,
    selection: TextSelection,
) -> Option<String> {
    if intercepts_click(path) {
        return None;
    }
    expand_to_word(text, selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_inside_hyphenated_word() {
        let text = "the quick-fox";
        for offset in 4..=9 {
            assert_eq!(
                expand_to_word(text, TextSelection::caret(offset)).as_deref(),
                Some("quick"),
                "caret at {offset}"
            );
        }
        assert_eq!(
            expand_to_word(text, TextSelection::caret(11)).as_deref(),
            Some("fox")
        );
    }

    #[test]
    fn drag_selection_drops_punctuation() {
        let text = "the quick-fox";
        let drag = |start, end| expand_to_word(text, TextSelection { start, end });

        assert_eq!(drag(4, 10).as_deref(), Some("quick"));
        assert_eq!(drag(9, 13).as_deref(), Some("fox"));
        assert_eq!(drag(6, 13).as_deref(), Some("quick"));
        assert_eq!(drag(10, 4).as_deref(), Some("quick"));
        assert_eq!(drag(3, 4).as_deref(), Some("quick"));
        assert_eq!(expand_to_word("a -- b", TextSelection { start: 2, end: 4 }), None);
    }

    #[test]
    fn word_at_text_boundaries() {
        assert_eq!(
            expand_to_word("apple pie", TextSelection::caret(0)).as_deref(),
            Some("apple")
        );
        assert_eq!(
            expand_to_word("apple pie", TextSelection::caret(9)).as_deref(),
            Some("pie")
        );
    }

    #[test]
    fn non_latin_letters_count_as_letters() {
        assert_eq!(
            expand_to_word("слово, ещё", TextSelection::caret(8)).as_deref(),
            Some("ещё")
        );
        assert_eq!(
            expand_to_word("(λόγος)", TextSelection::caret(3)).as_deref(),
            Some("λόγος")
        );
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert_eq!(expand_to_word("a -- b", TextSelection::caret(3)), None);
        assert_eq!(expand_to_word("", TextSelection::caret(0)), None);
    }

    #[test]
    fn offsets_past_the_end_are_clamped() {
        assert_eq!(
            expand_to_word("fox", TextSelection::caret(40)).as_deref(),
            Some("fox")
        );
    }

    #[test]
    fn clicks_on_links_and_handlers_are_left_alone() {
        let text = "the quick-fox";
        let selection = TextSelection::caret(6);
        assert_eq!(on_article_click(&[ElementInfo::new("A", false)], text, selection), None);
        assert_eq!(
            on_article_click(&[ElementInfo::new("span", true)], text, selection),
            None
        );
        assert_eq!(
            on_article_click(&[ElementInfo::new("span", false)], text, selection).as_deref(),
            Some("quick")
        );
    }
}
