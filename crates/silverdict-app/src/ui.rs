use std::io::Write;

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use silverdict_core::controller::SearchController;
use silverdict_core::document::ScrollPosition;
use silverdict_core::l10n::Strings;
use silverdict_core::notify::Notifier;
use silverdict_types::SurfaceKind;

/// Alerts go to stderr so they survive a screen redraw
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("! {}", message.replace('\n', "\n  "));
    }
}

/// Everything one frame shows
pub struct Frame<'a> {
    pub controller: &'a SearchController,
    pub list: &'a [String],
    pub scroll: Option<ScrollPosition>,
    pub notice: Option<&'a str>,
}

/// Draws the search screen as plain text, with ANSI styling on a terminal
pub struct Renderer {
    strings: Strings,
    ansi: bool,
}

impl Renderer {
    pub fn new(strings: Strings) -> Self {
        let ansi = atty::is(atty::Stream::Stdout);
        colored::control::set_override(ansi);
        Self { strings, ansi }
    }

    pub fn plain(strings: Strings) -> Self {
        Self {
            strings,
            ansi: false,
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.ansi { text.bold().to_string() } else { text.to_string() }
    }

    fn dim(&self, text: &str) -> String {
        if self.ansi { text.dimmed().to_string() } else { text.to_string() }
    }

    pub fn draw(&self, frame: &Frame<'_>) -> String {
        let controller = frame.controller;
        let session = controller.session();
        let mut out = String::new();

        let header = format!("[{}] {}", controller.surface(), session.active_group);
        out.push_str(&format!("{}\n", self.dim(&header)));

        if session.search_term.is_empty() {
            let placeholder = self.strings.get("search-placeholder");
            out.push_str(&format!("> {}\n", self.dim(placeholder)));
        } else {
            out.push_str(&format!("> {}\n", session.search_term));
        }

        if controller.surface() != SurfaceKind::FullText {
            for (index, item) in frame.list.iter().enumerate() {
                if index == session.selected_index {
                    out.push_str(&format!("{}\n", self.bold(&format!("* {item}"))));
                } else {
                    out.push_str(&format!("  {item}\n"));
                }
            }
        }

        if !session.fts_matches.is_empty() {
            for (index, found) in session.fts_matches.iter().enumerate() {
                out.push_str(&format!("  [{index}] {}: {}\n", found.dict, found.word));
            }
        } else if !session.active_dictionaries.is_empty() {
            let dictionaries = session.active_dictionaries.join(" | ");
            out.push_str(&format!("{}\n", self.dim(&dictionaries)));
        }

        let article = &controller.rendered().text;
        if !article.is_empty() {
            out.push_str("----\n");
            if let Some(ScrollPosition::Element(name)) = &frame.scroll {
                out.push_str(&format!("{}\n", self.dim(&format!("(at #{name})"))));
            }
            out.push_str(article.trim_end());
            out.push('\n');
        }

        if let Some(notice) = frame.notice {
            out.push_str(&format!("{}\n", self.bold(notice)));
        }
        out
    }

    pub fn present(&self, frame: &Frame<'_>) {
        let mut stdout = std::io::stdout().lock();
        let written = if self.ansi {
            queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))
        } else {
            Ok(())
        };
        if let Err(e) = written
            .and_then(|_| stdout.write_all(self.draw(frame).as_bytes()))
            .and_then(|_| stdout.flush())
        {
            tracing::error!("Failed to draw screen: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styling_only_on_a_terminal() {
        let plain = Renderer::plain(Strings::default());
        assert_eq!(plain.bold("apple"), "apple");
        assert_eq!(plain.dim("apple"), "apple");

        colored::control::set_override(true);
        let styled = Renderer {
            strings: Strings::default(),
            ansi: true,
        };
        assert_eq!(styled.bold("apple"), "apple".bold().to_string());
        assert_ne!(styled.dim("apple"), "apple");
    }
}
