use clap::{Args, Parser, Subcommand, ValueEnum};
use silverdict_types::SurfaceKind;

#[derive(Parser, Debug)]
#[command(name = "silverdict")]
#[command(about = "Terminal client for a SilverDict server", long_about = None)]
pub struct Cli {
    /// Named profile under the user config directory
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Backend API prefix, e.g. http://127.0.0.1:2628/api
    #[arg(long, global = true)]
    pub api_prefix: Option<String>,

    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Group searched in (defaults to the configured default group)
    #[arg(long, global = true)]
    pub group: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive search screen driven by stdin (the default)
    Interactive {
        #[arg(long, value_enum, default_value_t = Surface::Query)]
        surface: Surface,

        /// Deep link such as `?group=English&key=hello`
        #[arg(long)]
        open: Option<String>,
    },
    /// Look a word up and print the articles
    Query { term: String },
    /// Look a word up with the card-making renderer
    Anki { term: String },
    /// Full-text search
    Fts { term: String },
    /// Print autocomplete suggestions
    Suggest { term: String },
    /// Show or clear the lookup history
    History {
        #[arg(long)]
        clear: bool,
    },
    Groups {
        #[command(subcommand)]
        action: GroupAction,
    },
    Dictionaries {
        #[command(subcommand)]
        action: DictionaryAction,
    },
    Sources {
        #[command(subcommand)]
        action: SourceAction,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Rebuild a backend index
    Reindex {
        #[arg(value_enum)]
        index: Index,
    },
    /// Create a profile from the main one
    NewProfile { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Surface {
    Query,
    Anki,
    Fts,
}

impl From<Surface> for SurfaceKind {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Query => SurfaceKind::Query,
            Surface::Anki => SurfaceKind::Anki,
            Surface::Fts => SurfaceKind::FullText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Index {
    Ngram,
    Xapian,
}

#[derive(Subcommand, Debug)]
pub enum GroupAction {
    List,
    Add {
        name: String,
        /// Comma separated ISO 639-1 codes
        #[arg(long, default_value = "")]
        lang: String,
    },
    Rename {
        old: String,
        new: String,
    },
    Lang {
        name: String,
        lang: String,
    },
    Delete {
        name: String,
    },
    /// Move the named groups to the front, in this order
    Reorder {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct NewDictionary {
    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub file: String,

    #[arg(long)]
    pub format: String,

    /// Group the dictionary is added to
    #[arg(long, default_value = "Default Group")]
    pub into: String,
}

#[derive(Subcommand, Debug)]
pub enum DictionaryAction {
    List,
    Add(NewDictionary),
    Rename {
        name: String,
        display: String,
    },
    Delete {
        name: String,
    },
    Reorder {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Put a dictionary into a group
    Join {
        dictionary: String,
        group: String,
    },
    /// Take a dictionary out of a group
    Leave {
        dictionary: String,
        group: String,
    },
    /// Number of headwords
    Count {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SourceAction {
    List,
    Add { source: String },
    Delete { source: String },
    Scan,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show,
    HistorySize { size: i64 },
    Suggestions { size: i64 },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let cli = Cli::parse_from([
            "silverdict",
            "query",
            "apple",
            "--group",
            "English",
            "--api-prefix",
            "http://dict.local/api",
        ]);
        assert_eq!(cli.group.as_deref(), Some("English"));
        assert_eq!(cli.api_prefix.as_deref(), Some("http://dict.local/api"));
        assert!(matches!(cli.command, Some(Command::Query { term }) if term == "apple"));
    }

    #[test]
    fn negative_sizes_parse_for_validation() {
        let cli = Cli::parse_from(["silverdict", "settings", "history-size", "--", "-1"]);
        assert!(matches!(
            cli.command,
            Some(Command::Settings {
                action: SettingsAction::HistorySize { size: -1 }
            })
        ));
    }
}
