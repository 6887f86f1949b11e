use silverdict_api::ManagementApi;
use silverdict_types::{DictionaryRecord, Groupings, LibrarySnapshot, NewDictionaryBody};

use crate::error::{ValidationError, WorkflowError};
use crate::library::Library;
use crate::notify::Alerts;
use crate::workflow::{EntityWorkflow, require_name};

fn existing_dictionary(library: &Library, name: &str) -> Result<(), ValidationError> {
    match library.dictionary(name) {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnknownDictionary(name.to_string())),
    }
}

/// File stem up to the first dot: `/dicts/oald.dsl.dz` is `oald`
pub fn dictionary_name(filename: &str) -> &str {
    let file = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    file.split('.').next().unwrap_or(file)
}

/// Register a dictionary file and put it into a group
pub struct AddDictionary {
    record: DictionaryRecord,
    group: String,
}

impl AddDictionary {
    pub fn new(display_name: &str, filename: &str, format: &str, group: &str) -> Self {
        let filename = filename.trim();
        Self {
            record: DictionaryRecord {
                dictionary_display_name: display_name.trim().to_string(),
                dictionary_name: dictionary_name(filename).to_string(),
                dictionary_format: format.to_string(),
                dictionary_filename: filename.to_string(),
            },
            group: group.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for AddDictionary {
    type Output = LibrarySnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-adding-dictionary"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        let record = &self.record;
        require_name(&record.dictionary_display_name)?;
        if record.dictionary_filename.is_empty() || record.dictionary_name.is_empty() {
            return Err(ValidationError::MissingField("filename"));
        }
        if !library.formats.contains(&record.dictionary_format) {
            return Err(ValidationError::UnsupportedFormat(
                record.dictionary_format.clone(),
            ));
        }
        if library.dictionary(&record.dictionary_name).is_some() {
            return Err(ValidationError::DuplicateDictionary(
                record.dictionary_name.clone(),
            ));
        }
        if !library.has_group(&self.group) {
            return Err(ValidationError::UnknownGroup(self.group.clone()));
        }
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<LibrarySnapshot, WorkflowError> {
        if !api.validate_dictionary(&self.record).await? {
            return Err(ValidationError::InvalidDictionary.into());
        }
        let body = NewDictionaryBody {
            record: self.record.clone(),
            group_name: self.group.clone(),
        };
        Ok(api.add_dictionary(&body).await?)
    }

    fn on_success(&self, library: &mut Library, output: LibrarySnapshot) {
        tracing::info!(
            "Added dictionary {} to {}",
            self.record.dictionary_name,
            self.group
        );
        library.apply_library(output);
    }
}

pub struct RenameDictionary {
    name: String,
    display: String,
}

impl RenameDictionary {
    pub fn new(name: &str, display: &str) -> Self {
        Self {
            name: name.to_string(),
            display: display.trim().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for RenameDictionary {
    type Output = bool;

    fn failure_key(&self) -> &'static str {
        "failure-renaming-dictionary"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        existing_dictionary(library, &self.name)?;
        require_name(&self.display).map(|_| ())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<bool, WorkflowError> {
        let body = api.rename_dictionary(&self.name, &self.display).await?;
        if body.success {
            Ok(true)
        } else {
            Err(ValidationError::UnknownDictionary(self.name.clone()).into())
        }
    }

    fn on_success(&self, library: &mut Library, _output: bool) {
        if let Some(dictionary) = library
            .dictionaries
            .iter_mut()
            .find(|d| d.name == self.name)
        {
            dictionary.display_name = self.display.clone();
        }
    }
}

pub struct DeleteDictionary {
    name: String,
}

impl DeleteDictionary {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for DeleteDictionary {
    type Output = LibrarySnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-deleting-dictionary"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        existing_dictionary(library, &self.name)
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<LibrarySnapshot, WorkflowError> {
        Ok(api.delete_dictionary(&self.name).await?)
    }

    fn on_success(&self, library: &mut Library, output: LibrarySnapshot) {
        tracing::info!("Deleted dictionary {}", self.name);
        library.apply_library(output);
    }
}

pub struct ReorderDictionaries {
    order: Vec<DictionaryRecord>,
}

impl ReorderDictionaries {
    /// Dictionaries left out of `names` follow the named ones in their current order
    pub fn from_names(library: &Library, names: &[String]) -> Result<Self, ValidationError> {
        let mut order: Vec<DictionaryRecord> = Vec::with_capacity(library.dictionaries.len());
        for name in names {
            let dictionary = library
                .dictionary(name)
                .ok_or_else(|| ValidationError::UnknownDictionary(name.clone()))?;
            if !order.iter().any(|r| r.dictionary_name == dictionary.name) {
                order.push(dictionary.into());
            }
        }
        for dictionary in &library.dictionaries {
            if !order.iter().any(|r| r.dictionary_name == dictionary.name) {
                order.push(dictionary.into());
            }
        }
        Ok(Self { order })
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for ReorderDictionaries {
    type Output = Vec<DictionaryRecord>;

    fn failure_key(&self) -> &'static str {
        "failure-reordering-dictionaries"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        self.order
            .iter()
            .try_for_each(|r| existing_dictionary(library, &r.dictionary_name))
    }

    async fn submit(
        &self,
        api: &dyn ManagementApi,
    ) -> Result<Vec<DictionaryRecord>, WorkflowError> {
        Ok(api.reorder_dictionaries(&self.order).await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<DictionaryRecord>) {
        library.set_dictionaries(output);
    }
}

/// Add a dictionary to a group, or take it out
pub struct UpdateGrouping {
    dictionary: String,
    group: String,
    member: bool,
}

impl UpdateGrouping {
    pub fn add(dictionary: &str, group: &str) -> Self {
        Self {
            dictionary: dictionary.to_string(),
            group: group.to_string(),
            member: true,
        }
    }

    pub fn remove(dictionary: &str, group: &str) -> Self {
        Self {
            member: false,
            ..Self::add(dictionary, group)
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for UpdateGrouping {
    type Output = Groupings;

    fn failure_key(&self) -> &'static str {
        "failure-updating-groupings"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        existing_dictionary(library, &self.dictionary)?;
        if library.has_group(&self.group) {
            Ok(())
        } else {
            Err(ValidationError::UnknownGroup(self.group.clone()))
        }
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Groupings, WorkflowError> {
        let groupings = if self.member {
            api.add_to_group(&self.dictionary, &self.group).await?
        } else {
            api.remove_from_group(&self.dictionary, &self.group).await?
        };
        Ok(groupings)
    }

    fn on_success(&self, library: &mut Library, output: Groupings) {
        library.groupings = output;
    }
}

/// Number of headwords in a dictionary; alerts and returns `None` on failure
pub async fn headword_count(api: &dyn ManagementApi, alerts: &Alerts, name: &str) -> Option<u64> {
    match api.headword_count(name).await {
        Ok(count) => Some(count),
        Err(e) => {
            alerts.failure("failure-fetching-headword-count", &e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Backend, Fixture, record};
    use crate::workflow::{WorkflowOutcome, run_workflow};

    fn stocked() -> Backend {
        let mut backend = Backend::default();
        backend.dictionaries = vec![record("oald"), record("webster"), record("cedict")];
        backend.groupings.insert(
            "Default Group".into(),
            ["oald", "webster", "cedict"].map(String::from).into(),
        );
        backend
    }

    #[test]
    fn name_comes_from_file_stem() {
        assert_eq!(dictionary_name("/home/alice/dicts/oald.dsl.dz"), "oald");
        assert_eq!(dictionary_name(r"C:\dicts\webster.mdx"), "webster");
        assert_eq!(dictionary_name("plain"), "plain");
    }

    #[tokio::test]
    async fn add_dictionary_goes_through_server_validator() {
        let fx = Fixture::new(stocked()).await;
        fx.api.backend().valid_dictionary = false;

        let add = AddDictionary::new("Collins", "/dicts/collins.ifo", "StarDict (.ifo)", "Default Group");
        assert_eq!(
            run_workflow(&add, &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Rejected(ValidationError::InvalidDictionary)
        );
        assert!(fx.state.library.read().await.dictionary("collins").is_none());

        fx.api.backend().valid_dictionary = true;
        assert_eq!(
            run_workflow(&add, &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Applied
        );
        let library = fx.state.library.read().await;
        assert_eq!(library.dictionary("collins").unwrap().display_name, "Collins");
        assert!(library.groupings["Default Group"].contains("collins"));
    }

    #[tokio::test]
    async fn add_dictionary_checks_fields_locally() {
        let fx = Fixture::new(stocked()).await;
        let cases = [
            (
                AddDictionary::new("", "/dicts/x.ifo", "StarDict (.ifo)", "Default Group"),
                ValidationError::EmptyName,
            ),
            (
                AddDictionary::new("X", "", "StarDict (.ifo)", "Default Group"),
                ValidationError::MissingField("filename"),
            ),
            (
                AddDictionary::new("X", "/dicts/x.bgl", "Babylon", "Default Group"),
                ValidationError::UnsupportedFormat("Babylon".into()),
            ),
            (
                AddDictionary::new("X", "/dicts/oald.ifo", "StarDict (.ifo)", "Default Group"),
                ValidationError::DuplicateDictionary("oald".into()),
            ),
            (
                AddDictionary::new("X", "/dicts/x.ifo", "StarDict (.ifo)", "Nope"),
                ValidationError::UnknownGroup("Nope".into()),
            ),
        ];

        for (workflow, expected) in cases {
            assert_eq!(
                run_workflow(&workflow, &fx.api, &fx.state, &fx.alerts).await,
                WorkflowOutcome::Rejected(expected)
            );
        }
        assert!(fx.api.calls().iter().all(|c| !c.starts_with("validate")));
    }

    #[tokio::test]
    async fn rename_reorder_and_delete() {
        let fx = Fixture::new(stocked()).await;

        let rename = RenameDictionary::new("oald", " Oxford ");
        assert_eq!(
            run_workflow(&rename, &fx.api, &fx.state, &fx.alerts).await,
            WorkflowOutcome::Applied
        );
        assert_eq!(
            fx.state.library.read().await.dictionary("oald").unwrap().display_name,
            "Oxford"
        );

        let reorder = {
            let library = fx.state.library.read().await;
            ReorderDictionaries::from_names(&library, &["cedict".to_string()]).unwrap()
        };
        run_workflow(&reorder, &fx.api, &fx.state, &fx.alerts).await;
        assert_eq!(
            fx.state.library.read().await.dictionaries_in_group("Default Group"),
            Some(vec!["cedict".into(), "oald".into(), "webster".into()])
        );

        run_workflow(&DeleteDictionary::new("webster"), &fx.api, &fx.state, &fx.alerts).await;
        let library = fx.state.library.read().await;
        assert!(library.dictionary("webster").is_none());
        assert!(!library.groupings["Default Group"].contains("webster"));
    }

    #[tokio::test]
    async fn membership_toggles() {
        let fx = Fixture::new(stocked()).await;
        fx.api.add_group(&silverdict_types::Group {
            name: "Chinese".into(),
            lang: Default::default(),
        })
        .await
        .unwrap();
        fx.state.initialise(&fx.api).await.unwrap();

        run_workflow(&UpdateGrouping::add("cedict", "Chinese"), &fx.api, &fx.state, &fx.alerts)
            .await;
        assert_eq!(
            fx.state.library.read().await.dictionaries_in_group("Chinese"),
            Some(vec!["cedict".into()])
        );

        run_workflow(
            &UpdateGrouping::remove("cedict", "Chinese"),
            &fx.api,
            &fx.state,
            &fx.alerts,
        )
        .await;
        assert_eq!(
            fx.state.library.read().await.dictionaries_in_group("Chinese"),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn headword_count_alerts_on_failure() {
        let fx = Fixture::new(stocked()).await;
        assert_eq!(headword_count(&fx.api, &fx.alerts, "oald").await, Some(42));

        fx.api.fail(true);
        assert_eq!(headword_count(&fx.api, &fx.alerts, "oald").await, None);
        assert!(fx.notifier.messages()[0].starts_with("Failed to fetch headword count."));
    }
}
