use std::collections::BTreeSet;

use silverdict_api::ManagementApi;
use silverdict_types::{Group, GroupsSnapshot};

use crate::error::{ValidationError, WorkflowError};
use crate::language::{parse_lang_string, validate_languages};
use crate::library::Library;
use crate::workflow::{EntityWorkflow, require_name};

fn existing_group<'a>(library: &'a Library, name: &str) -> Result<&'a Group, ValidationError> {
    library
        .group(name)
        .ok_or_else(|| ValidationError::UnknownGroup(name.to_string()))
}

fn unprotected(name: &str) -> Result<(), ValidationError> {
    if Library::is_default_group(name) {
        Err(ValidationError::ProtectedGroup)
    } else {
        Ok(())
    }
}

pub struct AddGroup {
    name: String,
    lang: BTreeSet<String>,
}

impl AddGroup {
    /// `lang` is a comma separated list of ISO 639-1 codes
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            lang: parse_lang_string(lang),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for AddGroup {
    type Output = GroupsSnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-adding-group"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        let name = require_name(&self.name)?;
        if library.has_group(name) {
            return Err(ValidationError::DuplicateGroup(name.to_string()));
        }
        validate_languages(&self.lang)
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<GroupsSnapshot, WorkflowError> {
        let group = Group {
            name: self.name.clone(),
            lang: self.lang.clone(),
        };
        Ok(api.add_group(&group).await?)
    }

    fn on_success(&self, library: &mut Library, output: GroupsSnapshot) {
        tracing::info!("Added group {}", self.name);
        library.apply_groups(output);
    }
}

pub struct RenameGroup {
    old: String,
    new: String,
}

impl RenameGroup {
    pub fn new(old: &str, new: &str) -> Self {
        Self {
            old: old.to_string(),
            new: new.trim().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for RenameGroup {
    type Output = GroupsSnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-renaming-group"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        unprotected(&self.old)?;
        existing_group(library, &self.old)?;
        let new = require_name(&self.new)?;
        if library.has_group(new) {
            return Err(ValidationError::DuplicateGroup(new.to_string()));
        }
        Ok(())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<GroupsSnapshot, WorkflowError> {
        Ok(api.rename_group(&self.old, &self.new).await?)
    }

    fn on_success(&self, library: &mut Library, output: GroupsSnapshot) {
        tracing::info!("Renamed group {} to {}", self.old, self.new);
        library.apply_groups(output);
    }
}

pub struct ChangeGroupLang {
    name: String,
    lang: BTreeSet<String>,
}

impl ChangeGroupLang {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: parse_lang_string(lang),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for ChangeGroupLang {
    type Output = Vec<Group>;

    fn failure_key(&self) -> &'static str {
        "failure-changing-group-lang"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        existing_group(library, &self.name)?;
        validate_languages(&self.lang)
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Vec<Group>, WorkflowError> {
        Ok(api.change_group_lang(&self.name, &self.lang).await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<Group>) {
        library.groups = output;
    }
}

pub struct DeleteGroup {
    name: String,
}

impl DeleteGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for DeleteGroup {
    type Output = GroupsSnapshot;

    fn failure_key(&self) -> &'static str {
        "failure-deleting-group"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        unprotected(&self.name)?;
        existing_group(library, &self.name).map(|_| ())
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<GroupsSnapshot, WorkflowError> {
        Ok(api.delete_group(&self.name).await?)
    }

    fn on_success(&self, library: &mut Library, output: GroupsSnapshot) {
        tracing::info!("Deleted group {}", self.name);
        library.apply_groups(output);
    }
}

/// New order of every group
pub struct ReorderGroups {
    order: Vec<Group>,
}

impl ReorderGroups {
    /// Groups left out of `names` keep their relative order after the named ones
    pub fn from_names(library: &Library, names: &[String]) -> Result<Self, ValidationError> {
        let mut order = Vec::with_capacity(library.groups.len());
        for name in names {
            let group = existing_group(library, name)?;
            if !order.iter().any(|g: &Group| g.name == group.name) {
                order.push(group.clone());
            }
        }
        for group in &library.groups {
            if !order.iter().any(|g| g.name == group.name) {
                order.push(group.clone());
            }
        }
        Ok(Self { order })
    }
}

#[async_trait::async_trait]
impl EntityWorkflow for ReorderGroups {
    type Output = Vec<Group>;

    fn failure_key(&self) -> &'static str {
        "failure-reordering-groups"
    }

    fn validate(&self, library: &Library) -> Result<(), ValidationError> {
        match self.order.iter().find(|g| !library.has_group(&g.name)) {
            Some(group) => Err(ValidationError::UnknownGroup(group.name.clone())),
            None => Ok(()),
        }
    }

    async fn submit(&self, api: &dyn ManagementApi) -> Result<Vec<Group>, WorkflowError> {
        Ok(api.reorder_groups(&self.order).await?)
    }

    fn on_success(&self, library: &mut Library, output: Vec<Group>) {
        library.groups = output;
    }
}
