use std::collections::BTreeSet;

use reqwest::Method;
use silverdict_types::{
    CountBody, DictionaryRecord, DisplayNameBody, Group, GroupLangBody, GroupRenameBody,
    GroupingBody, Groupings, GroupsSnapshot, LibrarySnapshot, NameBody, NewDictionaryBody,
    SizeBody, SourceBody, SuccessBody, ValidBody,
};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Library management endpoints under `/management` and `/validator`
#[async_trait::async_trait]
pub trait ManagementApi: Send + Sync {
    async fn dictionaries(&self) -> Result<Vec<DictionaryRecord>, ApiError>;
    async fn add_dictionary(&self, body: &NewDictionaryBody) -> Result<LibrarySnapshot, ApiError>;
    async fn delete_dictionary(&self, name: &str) -> Result<LibrarySnapshot, ApiError>;
    /// Replaces the whole dictionary order
    async fn reorder_dictionaries(
        &self,
        order: &[DictionaryRecord],
    ) -> Result<Vec<DictionaryRecord>, ApiError>;
    async fn rename_dictionary(&self, name: &str, display: &str) -> Result<SuccessBody, ApiError>;
    async fn headword_count(&self, name: &str) -> Result<u64, ApiError>;

    async fn groups(&self) -> Result<Vec<Group>, ApiError>;
    async fn add_group(&self, group: &Group) -> Result<GroupsSnapshot, ApiError>;
    async fn delete_group(&self, name: &str) -> Result<GroupsSnapshot, ApiError>;
    /// Replaces the whole group order
    async fn reorder_groups(&self, order: &[Group]) -> Result<Vec<Group>, ApiError>;
    async fn rename_group(&self, old: &str, new: &str) -> Result<GroupsSnapshot, ApiError>;
    async fn change_group_lang(
        &self,
        name: &str,
        lang: &BTreeSet<String>,
    ) -> Result<Vec<Group>, ApiError>;

    async fn groupings(&self) -> Result<Groupings, ApiError>;
    async fn add_to_group(&self, dictionary: &str, group: &str) -> Result<Groupings, ApiError>;
    async fn remove_from_group(&self, dictionary: &str, group: &str)
    -> Result<Groupings, ApiError>;

    async fn clear_history(&self) -> Result<Vec<String>, ApiError>;
    async fn history_size(&self) -> Result<i64, ApiError>;
    async fn set_history_size(&self, size: i64) -> Result<i64, ApiError>;
    async fn num_suggestions(&self) -> Result<i64, ApiError>;
    async fn set_num_suggestions(&self, size: i64) -> Result<i64, ApiError>;

    async fn sources(&self) -> Result<Vec<String>, ApiError>;
    async fn add_source(&self, source: &str) -> Result<Vec<String>, ApiError>;
    async fn delete_source(&self, source: &str) -> Result<Vec<String>, ApiError>;
    async fn formats(&self) -> Result<Vec<String>, ApiError>;
    /// Rescan the source roots for new dictionaries
    async fn scan(&self) -> Result<LibrarySnapshot, ApiError>;

    async fn create_ngram_table(&self) -> Result<SuccessBody, ApiError>;
    async fn create_xapian_index(&self) -> Result<SuccessBody, ApiError>;

    async fn validate_dictionary(&self, record: &DictionaryRecord) -> Result<bool, ApiError>;
    async fn validate_source(&self, source: &str) -> Result<bool, ApiError>;
}

#[async_trait::async_trait]
impl ManagementApi for ApiClient {
    async fn dictionaries(&self) -> Result<Vec<DictionaryRecord>, ApiError> {
        self.get("/management/dictionaries").await
    }

    async fn add_dictionary(&self, body: &NewDictionaryBody) -> Result<LibrarySnapshot, ApiError> {
        self.send(Method::POST, "/management/dictionaries", body)
            .await
    }

    async fn delete_dictionary(&self, name: &str) -> Result<LibrarySnapshot, ApiError> {
        let body = NameBody {
            name: name.to_string(),
        };
        self.send(Method::DELETE, "/management/dictionaries", &body)
            .await
    }

    async fn reorder_dictionaries(
        &self,
        order: &[DictionaryRecord],
    ) -> Result<Vec<DictionaryRecord>, ApiError> {
        self.send(Method::PUT, "/management/dictionaries", order)
            .await
    }

    async fn rename_dictionary(&self, name: &str, display: &str) -> Result<SuccessBody, ApiError> {
        let body = DisplayNameBody {
            name: name.to_string(),
            display: display.to_string(),
        };
        self.send(Method::PUT, "/management/dictionary_name", &body)
            .await
    }

    async fn headword_count(&self, name: &str) -> Result<u64, ApiError> {
        let body = NameBody {
            name: name.to_string(),
        };
        let count: CountBody = self
            .send(Method::POST, "/management/headword_count", &body)
            .await?;
        Ok(count.count)
    }

    async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        self.get("/management/groups").await
    }

    async fn add_group(&self, group: &Group) -> Result<GroupsSnapshot, ApiError> {
        self.send(Method::POST, "/management/groups", group).await
    }

    async fn delete_group(&self, name: &str) -> Result<GroupsSnapshot, ApiError> {
        let body = NameBody {
            name: name.to_string(),
        };
        self.send(Method::DELETE, "/management/groups", &body).await
    }

    async fn reorder_groups(&self, order: &[Group]) -> Result<Vec<Group>, ApiError> {
        self.send(Method::PUT, "/management/groups", order).await
    }

    async fn rename_group(&self, old: &str, new: &str) -> Result<GroupsSnapshot, ApiError> {
        let body = GroupRenameBody {
            old: old.to_string(),
            new: new.to_string(),
        };
        self.send(Method::PUT, "/management/group_name", &body).await
    }

    async fn change_group_lang(
        &self,
        name: &str,
        lang: &BTreeSet<String>,
    ) -> Result<Vec<Group>, ApiError> {
        let body = GroupLangBody {
            name: name.to_string(),
            lang: lang.clone(),
        };
        self.send(Method::PUT, "/management/group_lang", &body).await
    }

    async fn groupings(&self) -> Result<Groupings, ApiError> {
        self.get("/management/dictionary_groupings").await
    }

    async fn add_to_group(&self, dictionary: &str, group: &str) -> Result<Groupings, ApiError> {
        let body = GroupingBody {
            dictionary_name: dictionary.to_string(),
            group_name: group.to_string(),
        };
        self.send(Method::POST, "/management/dictionary_groupings", &body)
            .await
    }

    async fn remove_from_group(
        &self,
        dictionary: &str,
        group: &str,
    ) -> Result<Groupings, ApiError> {
        let body = GroupingBody {
            dictionary_name: dictionary.to_string(),
            group_name: group.to_string(),
        };
        self.send(Method::DELETE, "/management/dictionary_groupings", &body)
            .await
    }

    async fn clear_history(&self) -> Result<Vec<String>, ApiError> {
        self.send(Method::DELETE, "/management/history", &serde_json::json!({}))
            .await
    }

    async fn history_size(&self) -> Result<i64, ApiError> {
        let size: SizeBody = self.get("/management/history_size").await?;
        Ok(size.size)
    }

    async fn set_history_size(&self, size: i64) -> Result<i64, ApiError> {
        let size: SizeBody = self
            .send(Method::PUT, "/management/history_size", &SizeBody { size })
            .await?;
        Ok(size.size)
    }

    async fn num_suggestions(&self) -> Result<i64, ApiError> {
        let size: SizeBody = self.get("/management/num_suggestions").await?;
        Ok(size.size)
    }

    async fn set_num_suggestions(&self, size: i64) -> Result<i64, ApiError> {
        let size: SizeBody = self
            .send(Method::PUT, "/management/num_suggestions", &SizeBody { size })
            .await?;
        Ok(size.size)
    }

    async fn sources(&self) -> Result<Vec<String>, ApiError> {
        self.get("/management/sources").await
    }

    async fn add_source(&self, source: &str) -> Result<Vec<String>, ApiError> {
        let body = SourceBody {
            source: source.to_string(),
        };
        self.send(Method::POST, "/management/sources", &body).await
    }

    async fn delete_source(&self, source: &str) -> Result<Vec<String>, ApiError> {
        let body = SourceBody {
            source: source.to_string(),
        };
        self.send(Method::DELETE, "/management/sources", &body).await
    }

    async fn formats(&self) -> Result<Vec<String>, ApiError> {
        self.get("/management/formats").await
    }

    async fn scan(&self) -> Result<LibrarySnapshot, ApiError> {
        self.get("/management/scan").await
    }

    async fn create_ngram_table(&self) -> Result<SuccessBody, ApiError> {
        self.get("/management/create_ngram_table").await
    }

    async fn create_xapian_index(&self) -> Result<SuccessBody, ApiError> {
        self.get("/management/create_xapian_index").await
    }

    async fn validate_dictionary(&self, record: &DictionaryRecord) -> Result<bool, ApiError> {
        let valid: ValidBody = self
            .send(Method::POST, "/validator/dictionary_info", record)
            .await?;
        Ok(valid.valid)
    }

    async fn validate_source(&self, source: &str) -> Result<bool, ApiError> {
        let body = SourceBody {
            source: source.to_string(),
        };
        let valid: ValidBody = self
            .send(Method::POST, "/validator/source", &body)
            .await?;
        Ok(valid.valid)
    }
}
