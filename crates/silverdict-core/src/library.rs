use silverdict_types::{
    DEFAULT_GROUP_NAME, Dictionary, DictionaryRecord, Group, Groupings, GroupsSnapshot,
    LibrarySnapshot,
};

fn default_history_size() -> i64 {
    100
}

fn default_suggestion_size() -> i64 {
    10
}

/// Client-side copy of everything the management endpoints own
#[derive(Debug, Clone)]
pub struct Library {
    pub dictionaries: Vec<Dictionary>,
    pub groups: Vec<Group>,
    pub groupings: Groupings,
    /// Most recent first
    pub history: Vec<String>,
    pub history_size: i64,
    pub suggestion_size: i64,
    pub formats: Vec<String>,
    pub sources: Vec<String>,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            dictionaries: Vec::new(),
            groups: Vec::new(),
            groupings: Groupings::new(),
            history: Vec::new(),
            history_size: default_history_size(),
            suggestion_size: default_suggestion_size(),
            formats: Vec::new(),
            sources: Vec::new(),
        }
    }
}

impl Library {
    /// Names of the dictionaries in `group`, in library order.
    ///
    /// `None` when the grouping map does not know the group.
    pub fn dictionaries_in_group(&self, group: &str) -> Option<Vec<String>> {
        let members = self.groupings.get(group)?;
        Some(
            self.dictionaries
                .iter()
                .filter(|d| members.contains(&d.name))
                .map(|d| d.name.clone())
                .collect(),
        )
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn dictionary(&self, name: &str) -> Option<&Dictionary> {
        self.dictionaries.iter().find(|d| d.name == name)
    }

    pub fn is_default_group(name: &str) -> bool {
        name == DEFAULT_GROUP_NAME
    }

    pub fn set_dictionaries(&mut self, records: Vec<DictionaryRecord>) {
        self.dictionaries = records.into_iter().map(Dictionary::from).collect();
    }

    pub fn apply_library(&mut self, snapshot: LibrarySnapshot) {
        self.set_dictionaries(snapshot.dictionaries);
        self.groupings = snapshot.groupings;
    }

    pub fn apply_groups(&mut self, snapshot: GroupsSnapshot) {
        self.groups = snapshot.groups;
        self.groupings = snapshot.groupings;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn dictionary(name: &str) -> Dictionary {
        Dictionary {
            name: name.into(),
            display_name: name.to_uppercase(),
            format: "StarDict (.ifo)".into(),
            filename: format!("/dicts/{name}.ifo"),
        }
    }

    #[test]
    fn group_members_follow_library_order() {
        let mut library = Library::default();
        library.dictionaries = vec![dictionary("c"), dictionary("a"), dictionary("b")];
        library.groupings.insert(
            "Default Group".into(),
            BTreeSet::from(["a".to_string(), "c".to_string()]),
        );

        assert_eq!(
            library.dictionaries_in_group("Default Group"),
            Some(vec!["c".to_string(), "a".to_string()])
        );
        assert_eq!(library.dictionaries_in_group("Missing"), None);
    }
}
