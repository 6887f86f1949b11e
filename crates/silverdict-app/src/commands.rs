use std::sync::Arc;

use anyhow::bail;
use silverdict_core::controller::{ControllerSettings, SearchController};
use silverdict_core::dispatcher::QueryCommit;
use silverdict_core::document::MemoryDocument;
use silverdict_core::workflow::{EntityWorkflow, WorkflowOutcome, run_workflow};
use silverdict_core::workflows::{
    AddDictionary, AddGroup, AddSource, ChangeGroupLang, ClearHistory, DeleteDictionary,
    DeleteGroup, DeleteSource, IndexKind, RebuildIndex, RenameDictionary, RenameGroup,
    ReorderDictionaries, ReorderGroups, ScanSources, SetHistorySize, SetSuggestionSize,
    UpdateGrouping, headword_count,
};
use silverdict_types::SurfaceKind;

use crate::cli::{
    Command, DictionaryAction, GroupAction, Index, SettingsAction, SourceAction,
};
use crate::events::Services;

/// Run one non-interactive command against an initialised library
pub async fn run_command(
    services: &Services,
    settings: ControllerSettings,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Query { term } => lookup(services, settings, SurfaceKind::Query, &term).await,
        Command::Anki { term } => lookup(services, settings, SurfaceKind::Anki, &term).await,
        Command::Fts { term } => lookup(services, settings, SurfaceKind::FullText, &term).await,
        Command::Suggest { term } => suggest(services, settings, &term).await,
        Command::History { clear: true } => apply(services, &ClearHistory).await,
        Command::History { clear: false } => {
            for word in &services.state.library.read().await.history {
                println!("{word}");
            }
            Ok(())
        }
        Command::Groups { action } => groups(services, action).await,
        Command::Dictionaries { action } => dictionaries(services, action).await,
        Command::Sources { action } => sources(services, action).await,
        Command::Settings { action } => settings_command(services, action).await,
        Command::Reindex { index } => {
            let kind = match index {
                Index::Ngram => IndexKind::Ngram,
                Index::Xapian => IndexKind::Xapian,
            };
            apply(services, &RebuildIndex(kind)).await
        }
        Command::Interactive { .. } | Command::NewProfile { .. } => {
            bail!("Not a one-shot command")
        }
    }
}

/// Alerts already explain failures; this only sets the exit status
async fn apply<W>(services: &Services, workflow: &W) -> anyhow::Result<()>
where
    W: EntityWorkflow + ?Sized,
{
    match run_workflow(
        workflow,
        services.management.as_ref(),
        &services.state,
        &services.alerts,
    )
    .await
    {
        WorkflowOutcome::Applied => Ok(()),
        WorkflowOutcome::Rejected(e) => bail!("Rejected: {e}"),
        WorkflowOutcome::Failed => bail!("Request failed"),
    }
}

fn one_shot(
    services: &Services,
    settings: ControllerSettings,
    surface: SurfaceKind,
) -> SearchController {
    SearchController::new(
        surface,
        settings,
        Arc::clone(&services.lookup),
        Arc::clone(&services.state),
        Arc::new(MemoryDocument::new()),
        services.alerts.clone(),
    )
}

async fn lookup(
    services: &Services,
    settings: ControllerSettings,
    surface: SurfaceKind,
    term: &str,
) -> anyhow::Result<()> {
    let mut controller = one_shot(services, settings, surface);
    let Some(request) = controller.search(term, None) else {
        bail!("Nothing to look up");
    };

    let outcome = request.send(services.lookup.as_ref()).await;
    if !matches!(
        controller.receive_article(outcome).await,
        QueryCommit::Committed(_)
    ) {
        bail!("Lookup of {term:?} failed");
    }

    let session = controller.session();
    for found in &session.fts_matches {
        println!("{}: {}", found.dict, found.word);
    }
    if !session.active_dictionaries.is_empty() {
        println!("[{}]", session.active_dictionaries.join(", "));
    }
    println!("{}", controller.rendered().text.trim_end());
    Ok(())
}

async fn suggest(
    services: &Services,
    settings: ControllerSettings,
    term: &str,
) -> anyhow::Result<()> {
    let mut controller = one_shot(services, settings, SurfaceKind::Query);
    let Some(request) = controller.set_search_term(term).await else {
        bail!("Nothing to complete");
    };

    let outcome = request.send(services.lookup.as_ref()).await;
    if controller.receive_suggestions(outcome).is_none() {
        bail!("Fetching suggestions failed");
    }
    for suggestion in controller.session().suggestions.iter().filter(|s| !s.is_empty()) {
        println!("{suggestion}");
    }
    Ok(())
}

async fn groups(services: &Services, action: GroupAction) -> anyhow::Result<()> {
    match action {
        GroupAction::List => {
            let library = services.state.library.read().await;
            for group in &library.groups {
                let lang: Vec<&str> = group.lang.iter().map(String::as_str).collect();
                let members = library.dictionaries_in_group(&group.name).unwrap_or_default();
                println!("{} [{}]: {}", group.name, lang.join(", "), members.join(", "));
            }
            Ok(())
        }
        GroupAction::Add { name, lang } => apply(services, &AddGroup::new(&name, &lang)).await,
        GroupAction::Rename { old, new } => apply(services, &RenameGroup::new(&old, &new)).await,
        GroupAction::Lang { name, lang } => {
            apply(services, &ChangeGroupLang::new(&name, &lang)).await
        }
        GroupAction::Delete { name } => apply(services, &DeleteGroup::new(&name)).await,
        GroupAction::Reorder { names } => {
            let workflow = ReorderGroups::from_names(&*services.state.library.read().await, &names);
            match workflow {
                Ok(workflow) => apply(services, &workflow).await,
                Err(e) => {
                    services.alerts.validation(&e);
                    bail!("Rejected: {e}")
                }
            }
        }
    }
}

async fn dictionaries(services: &Services, action: DictionaryAction) -> anyhow::Result<()> {
    match action {
        DictionaryAction::List => {
            for dictionary in &services.state.library.read().await.dictionaries {
                println!(
                    "{} ({}, {}): {}",
                    dictionary.display_name, dictionary.name, dictionary.format, dictionary.filename
                );
            }
            Ok(())
        }
        DictionaryAction::Add(new) => {
            let workflow = AddDictionary::new(&new.name, &new.file, &new.format, &new.into);
            apply(services, &workflow).await
        }
        DictionaryAction::Rename { name, display } => {
            apply(services, &RenameDictionary::new(&name, &display)).await
        }
        DictionaryAction::Delete { name } => apply(services, &DeleteDictionary::new(&name)).await,
        DictionaryAction::Reorder { names } => {
            let workflow =
                ReorderDictionaries::from_names(&*services.state.library.read().await, &names);
            match workflow {
                Ok(workflow) => apply(services, &workflow).await,
                Err(e) => {
                    services.alerts.validation(&e);
                    bail!("Rejected: {e}")
                }
            }
        }
        DictionaryAction::Join { dictionary, group } => {
            apply(services, &UpdateGrouping::add(&dictionary, &group)).await
        }
        DictionaryAction::Leave { dictionary, group } => {
            apply(services, &UpdateGrouping::remove(&dictionary, &group)).await
        }
        DictionaryAction::Count { name } => {
            match headword_count(services.management.as_ref(), &services.alerts, &name).await {
                Some(count) => {
                    println!("{count}");
                    Ok(())
                }
                None => bail!("Counting headwords of {name} failed"),
            }
        }
    }
}

async fn sources(services: &Services, action: SourceAction) -> anyhow::Result<()> {
    match action {
        SourceAction::List => {
            for source in &services.state.library.read().await.sources {
                println!("{source}");
            }
            Ok(())
        }
        SourceAction::Add { source } => apply(services, &AddSource::new(&source)).await,
        SourceAction::Delete { source } => apply(services, &DeleteSource::new(&source)).await,
        SourceAction::Scan => apply(services, &ScanSources).await,
    }
}

async fn settings_command(services: &Services, action: SettingsAction) -> anyhow::Result<()> {
    match action {
        SettingsAction::Show => {
            let library = services.state.library.read().await;
            println!("history size: {}", library.history_size);
            println!("suggestions: {}", library.suggestion_size);
            println!("formats: {}", library.formats.join(", "));
            Ok(())
        }
        SettingsAction::HistorySize { size } => apply(services, &SetHistorySize(size)).await,
        SettingsAction::Suggestions { size } => apply(services, &SetSuggestionSize(size)).await,
    }
}
