use kanal::AsyncSender;
use silverdict_types::{AppEvent, FocusTarget, NavKey, SurfaceKind, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Turn one line of terminal input into an event.
///
/// Plain text replaces the search term; `:` starts a command.
pub fn parse_line(line: &str) -> Result<Option<AppEvent>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(AppEvent::UiEvent(UiEvent::SearchTermChanged(
            line.to_string(),
        ))));
    };

    let (name, arg) = command
        .split_once(' ')
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));

    let ui = |event| Ok(Some(AppEvent::UiEvent(event)));
    let index = |arg: &str| {
        arg.parse::<usize>()
            .map_err(|_| format!("expected a number, got '{arg}'"))
    };

    match name {
        "" => Ok(None),
        "quit" | "q" => Ok(Some(AppEvent::Shutdown)),
        "reload" => Ok(Some(AppEvent::ConfigChanged)),
        "up" => ui(UiEvent::Key(NavKey::ArrowUp)),
        "down" => ui(UiEvent::Key(NavKey::ArrowDown)),
        "enter" => ui(UiEvent::Key(NavKey::Enter)),
        "clear" => ui(UiEvent::SearchTermChanged(String::new())),
        "pick" => ui(UiEvent::SelectListItem(index(arg)?)),
        "click" => ui(UiEvent::ClickArticle { offset: index(arg)? }),
        "match" => ui(UiEvent::JumpToMatch(index(arg)?)),
        "jump" if !arg.is_empty() => ui(UiEvent::JumpTo(arg.to_string())),
        "link" if !arg.is_empty() => ui(UiEvent::FollowLink {
            href: arg.to_string(),
        }),
        "group" if !arg.is_empty() => ui(UiEvent::SelectGroup(arg.to_string())),
        "search" if !arg.is_empty() => {
            let (term, anchor) = match arg.split_once('#') {
                Some((term, anchor)) => (term, Some(anchor.to_string())),
                None => (arg, None),
            };
            ui(UiEvent::SearchText {
                term: term.to_string(),
                anchor,
            })
        }
        "surface" => {
            let surface: SurfaceKind = arg.parse().map_err(|e| format!("{e}"))?;
            ui(UiEvent::SwitchSurface(surface))
        }
        "focus" => {
            let focus = match arg {
                "input" | "" => FocusTarget::SearchInput,
                "article" => FocusTarget::Article,
                _ => FocusTarget::Elsewhere,
            };
            ui(UiEvent::Focus(focus))
        }
        "clear-history" => ui(UiEvent::ClearHistory),
        other => Err(format!("unknown command ':{other}'")),
    }
}

/// Read stdin line by line until EOF or cancellation
pub async fn input_loop(
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = cancel.cancelled() => {
                tracing::info!("Input loop stopping");
                return Ok(());
            }
        };

        let Some(line) = line else {
            tracing::info!("stdin closed");
            event_tx.send(AppEvent::Shutdown).await?;
            return Ok(());
        };

        match parse_line(&line) {
            Ok(Some(event)) => event_tx.send(event).await?,
            Ok(None) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
}
