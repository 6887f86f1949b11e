//! Library management operations, one [`EntityWorkflow`](crate::workflow::EntityWorkflow) each.

mod dictionaries;
mod groups;
mod settings;
mod sources;

pub use dictionaries::{
    AddDictionary, DeleteDictionary, RenameDictionary, ReorderDictionaries, UpdateGrouping,
    headword_count,
};
pub use groups::{AddGroup, ChangeGroupLang, DeleteGroup, RenameGroup, ReorderGroups};
pub use settings::{ClearHistory, IndexKind, RebuildIndex, SetHistorySize, SetSuggestionSize};
pub use sources::{AddSource, DeleteSource, ScanSources};
