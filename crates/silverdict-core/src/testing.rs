//! In-memory backend and notifier for tests, here and in dependent crates.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use silverdict_api::{ApiError, LookupApi, ManagementApi};
use silverdict_types::{
    ArticleResponse, DictionaryRecord, FtsArticleResponse, FtsMatch, Group, Groupings,
    GroupsSnapshot, LibrarySnapshot, NewDictionaryBody, SuccessBody, SuggestionResponse,
};

use crate::l10n::Strings;
use crate::notify::{Alerts, Notifier};
use crate::state::AppState;

#[derive(Debug)]
pub struct Backend {
    pub failing: bool,
    pub articles: HashMap<String, String>,
    pub dictionaries: Vec<DictionaryRecord>,
    pub groups: Vec<Group>,
    pub groupings: Groupings,
    pub history: Vec<String>,
    pub history_size: i64,
    pub num_suggestions: i64,
    pub sources: Vec<String>,
    pub formats: Vec<String>,
    pub valid_dictionary: bool,
    pub valid_source: bool,
    /// Mutating calls in arrival order
    pub calls: Vec<String>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            failing: false,
            articles: HashMap::new(),
            dictionaries: Vec::new(),
            groups: vec![Group {
                name: "Default Group".into(),
                lang: BTreeSet::new(),
            }],
            groupings: Groupings::from([("Default Group".to_string(), BTreeSet::new())]),
            history: Vec::new(),
            history_size: 100,
            num_suggestions: 10,
            sources: Vec::new(),
            formats: vec!["StarDict (.ifo)".into(), "DSL (.dsl/.dsl.dz)".into()],
            valid_dictionary: true,
            valid_source: true,
            calls: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
}

impl FakeApi {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail(&self, failing: bool) {
        self.backend().failing = failing;
    }

    pub fn set_article(&self, term: &str, html: &str) {
        self.backend().articles.insert(term.into(), html.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.backend().calls.clone()
    }

    fn check(&self, call: String) -> Result<MutexGuard<'_, Backend>, ApiError> {
        let mut backend = self.backend();
        if backend.failing {
            return Err(ApiError::Status {
                status: 500,
                body: "backend down".into(),
            });
        }
        backend.calls.push(call);
        Ok(backend)
    }

    fn article(&self, term: &str) -> Result<String, ApiError> {
        let backend = self.check(format!("article {term}"))?;
        Ok(backend
            .articles
            .get(term)
            .cloned()
            .unwrap_or_else(|| format!(r#"<div id="oald">{term}</div>"#)))
    }
}

fn decoded(term: &str) -> String {
    urlencoding::decode(term)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| term.to_string())
}

#[async_trait::async_trait]
impl LookupApi for FakeApi {
    async fn suggestions(
        &self,
        _group: &str,
        term: &str,
        timestamp: u64,
    ) -> Result<SuggestionResponse, ApiError> {
        self.check(format!("suggestions {term}"))?;
        Ok(SuggestionResponse {
            timestamp,
            suggestions: vec![format!("{term}a"), format!("{term}b")],
        })
    }

    async fn query(&self, _group: &str, term: &str) -> Result<ArticleResponse, ApiError> {
        let articles = self.article(term)?;
        let mut backend = self.backend();
        let word = decoded(term);
        backend.history.retain(|h| *h != word);
        backend.history.insert(0, word);
        Ok(ArticleResponse {
            found: true,
            articles,
            dictionaries: vec!["oald".into()],
        })
    }

    async fn anki(&self, _group: &str, term: &str) -> Result<ArticleResponse, ApiError> {
        Ok(ArticleResponse {
            found: true,
            articles: self.article(term)?,
            dictionaries: vec!["oald".into()],
        })
    }

    async fn full_text_search(&self, term: &str) -> Result<FtsArticleResponse, ApiError> {
        self.check(format!("fts {term}"))?;
        let word = decoded(term);
        Ok(FtsArticleResponse {
            found: true,
            articles: format!(r#"<div id="oald__{word}">{word}</div>"#),
            dictionaries: vec![FtsMatch {
                dict: "oald".into(),
                word,
            }],
        })
    }

    async fn history(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.check("history".into())?.history.clone())
    }
}

#[async_trait::async_trait]
impl ManagementApi for FakeApi {
    async fn dictionaries(&self) -> Result<Vec<DictionaryRecord>, ApiError> {
        Ok(self.check("dictionaries".into())?.dictionaries.clone())
    }

    async fn add_dictionary(&self, body: &NewDictionaryBody) -> Result<LibrarySnapshot, ApiError> {
        let mut backend = self.check(format!("add_dictionary {}", body.record.dictionary_name))?;
        let name = body.record.dictionary_name.clone();
        backend.dictionaries.push(body.record.clone());
        backend
            .groupings
            .entry(body.group_name.clone())
            .or_default()
            .insert(name);
        Ok(LibrarySnapshot {
            dictionaries: backend.dictionaries.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn delete_dictionary(&self, name: &str) -> Result<LibrarySnapshot, ApiError> {
        let mut backend = self.check(format!("delete_dictionary {name}"))?;
        backend.dictionaries.retain(|d| d.dictionary_name != name);
        for members in backend.groupings.values_mut() {
            members.remove(name);
        }
        Ok(LibrarySnapshot {
            dictionaries: backend.dictionaries.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn reorder_dictionaries(
        &self,
        order: &[DictionaryRecord],
    ) -> Result<Vec<DictionaryRecord>, ApiError> {
        let mut backend = self.check("reorder_dictionaries".into())?;
        backend.dictionaries = order.to_vec();
        Ok(backend.dictionaries.clone())
    }

    async fn rename_dictionary(&self, name: &str, display: &str) -> Result<SuccessBody, ApiError> {
        let mut backend = self.check(format!("rename_dictionary {name} {display}"))?;
        let found = backend
            .dictionaries
            .iter_mut()
            .find(|d| d.dictionary_name == name)
            .map(|d| d.dictionary_display_name = display.to_string())
            .is_some();
        Ok(SuccessBody { success: found })
    }

    async fn headword_count(&self, name: &str) -> Result<u64, ApiError> {
        self.check(format!("headword_count {name}"))?;
        Ok(42)
    }

    async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        Ok(self.check("groups".into())?.groups.clone())
    }

    async fn add_group(&self, group: &Group) -> Result<GroupsSnapshot, ApiError> {
        let mut backend = self.check(format!("add_group {}", group.name))?;
        backend.groups.push(group.clone());
        backend.groupings.insert(group.name.clone(), BTreeSet::new());
        Ok(GroupsSnapshot {
            groups: backend.groups.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn delete_group(&self, name: &str) -> Result<GroupsSnapshot, ApiError> {
        let mut backend = self.check(format!("delete_group {name}"))?;
        backend.groups.retain(|g| g.name != name);
        backend.groupings.remove(name);
        Ok(GroupsSnapshot {
            groups: backend.groups.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn reorder_groups(&self, order: &[Group]) -> Result<Vec<Group>, ApiError> {
        let mut backend = self.check("reorder_groups".into())?;
        backend.groups = order.to_vec();
        Ok(backend.groups.clone())
    }

    async fn rename_group(&self, old: &str, new: &str) -> Result<GroupsSnapshot, ApiError> {
        let mut backend = self.check(format!("rename_group {old} {new}"))?;
        if let Some(group) = backend.groups.iter_mut().find(|g| g.name == old) {
            group.name = new.to_string();
        }
        if let Some(members) = backend.groupings.remove(old) {
            backend.groupings.insert(new.to_string(), members);
        }
        Ok(GroupsSnapshot {
            groups: backend.groups.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn change_group_lang(
        &self,
        name: &str,
        lang: &BTreeSet<String>,
    ) -> Result<Vec<Group>, ApiError> {
        let mut backend = self.check(format!("change_group_lang {name}"))?;
        if let Some(group) = backend.groups.iter_mut().find(|g| g.name == name) {
            group.lang = lang.clone();
        }
        Ok(backend.groups.clone())
    }

    async fn groupings(&self) -> Result<Groupings, ApiError> {
        Ok(self.check("groupings".into())?.groupings.clone())
    }

    async fn add_to_group(&self, dictionary: &str, group: &str) -> Result<Groupings, ApiError> {
        let mut backend = self.check(format!("add_to_group {dictionary} {group}"))?;
        backend
            .groupings
            .entry(group.to_string())
            .or_default()
            .insert(dictionary.to_string());
        Ok(backend.groupings.clone())
    }

    async fn remove_from_group(
        &self,
        dictionary: &str,
        group: &str,
    ) -> Result<Groupings, ApiError> {
        let mut backend = self.check(format!("remove_from_group {dictionary} {group}"))?;
        if let Some(members) = backend.groupings.get_mut(group) {
            members.remove(dictionary);
        }
        Ok(backend.groupings.clone())
    }

    async fn clear_history(&self) -> Result<Vec<String>, ApiError> {
        let mut backend = self.check("clear_history".into())?;
        backend.history.clear();
        Ok(Vec::new())
    }

    async fn history_size(&self) -> Result<i64, ApiError> {
        Ok(self.check("history_size".into())?.history_size)
    }

    async fn set_history_size(&self, size: i64) -> Result<i64, ApiError> {
        let mut backend = self.check(format!("set_history_size {size}"))?;
        backend.history_size = size;
        let keep = usize::try_from(size).unwrap_or_default();
        backend.history.truncate(keep);
        Ok(size)
    }

    async fn num_suggestions(&self) -> Result<i64, ApiError> {
        Ok(self.check("num_suggestions".into())?.num_suggestions)
    }

    async fn set_num_suggestions(&self, size: i64) -> Result<i64, ApiError> {
        let mut backend = self.check(format!("set_num_suggestions {size}"))?;
        backend.num_suggestions = size;
        Ok(size)
    }

    async fn sources(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.check("sources".into())?.sources.clone())
    }

    async fn add_source(&self, source: &str) -> Result<Vec<String>, ApiError> {
        let mut backend = self.check(format!("add_source {source}"))?;
        backend.sources.push(source.to_string());
        Ok(backend.sources.clone())
    }

    async fn delete_source(&self, source: &str) -> Result<Vec<String>, ApiError> {
        let mut backend = self.check(format!("delete_source {source}"))?;
        backend.sources.retain(|s| s != source);
        Ok(backend.sources.clone())
    }

    async fn formats(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.check("formats".into())?.formats.clone())
    }

    async fn scan(&self) -> Result<LibrarySnapshot, ApiError> {
        let backend = self.check("scan".into())?;
        Ok(LibrarySnapshot {
            dictionaries: backend.dictionaries.clone(),
            groupings: backend.groupings.clone(),
        })
    }

    async fn create_ngram_table(&self) -> Result<SuccessBody, ApiError> {
        self.check("create_ngram_table".into())?;
        Ok(SuccessBody { success: true })
    }

    async fn create_xapian_index(&self) -> Result<SuccessBody, ApiError> {
        self.check("create_xapian_index".into())?;
        Ok(SuccessBody { success: true })
    }

    async fn validate_dictionary(&self, record: &DictionaryRecord) -> Result<bool, ApiError> {
        Ok(self
            .check(format!("validate_dictionary {}", record.dictionary_name))?
            .valid_dictionary)
    }

    async fn validate_source(&self, source: &str) -> Result<bool, ApiError> {
        Ok(self.check(format!("validate_source {source}"))?.valid_source)
    }
}

/// Keeps every alert for inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Backend, state loaded from it, and alerts that are recorded
pub struct Fixture {
    pub api: FakeApi,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    pub alerts: Alerts,
}

impl Fixture {
    pub async fn new(backend: Backend) -> Self {
        let api = FakeApi::new(backend);
        let state = AppState::default();
        state
            .initialise(&api)
            .await
            .expect("fake backend loads");
        let notifier = Arc::new(RecordingNotifier::default());
        let alerts = Alerts::new(Strings::default(), notifier.clone());
        Self {
            api,
            state,
            notifier,
            alerts,
        }
    }
}

pub fn record(name: &str) -> DictionaryRecord {
    DictionaryRecord {
        dictionary_display_name: name.to_uppercase(),
        dictionary_name: name.to_string(),
        dictionary_format: "StarDict (.ifo)".into(),
        dictionary_filename: format!("/dicts/{name}.ifo"),
    }
}
