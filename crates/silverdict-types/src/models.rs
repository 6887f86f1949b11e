use std::collections::{BTreeMap, BTreeSet};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_GROUP_NAME: &str = "Default Group";
/// Group the backend reserves for full-text search
pub const XAPIAN_GROUP_NAME: &str = "Xapian";

/// Group name -> names of the dictionaries in it
pub type Groupings = BTreeMap<String, BTreeSet<String>>;

/// Dictionary as the client works with it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dictionary {
    pub name: String,
    pub display_name: String,
    pub format: String,
    pub filename: String,
}

/// Dictionary as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryRecord {
    #[serde(default)]
    pub dictionary_display_name: String,
    pub dictionary_name: String,
    #[serde(default)]
    pub dictionary_format: String,
    #[serde(default)]
    pub dictionary_filename: String,
}

impl From<DictionaryRecord> for Dictionary {
    fn from(record: DictionaryRecord) -> Self {
        Self {
            name: record.dictionary_name,
            display_name: record.dictionary_display_name,
            format: record.dictionary_format,
            filename: record.dictionary_filename,
        }
    }
}

impl From<Dictionary> for DictionaryRecord {
    fn from(dictionary: Dictionary) -> Self {
        Self {
            dictionary_display_name: dictionary.display_name,
            dictionary_name: dictionary.name,
            dictionary_format: dictionary.format,
            dictionary_filename: dictionary.filename,
        }
    }
}

impl From<&Dictionary> for DictionaryRecord {
    fn from(dictionary: &Dictionary) -> Self {
        dictionary.clone().into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub lang: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestionResponse {
    #[serde(deserialize_with = "timestamp_millis")]
    pub timestamp: u64,
    pub suggestions: Vec<String>,
}

/// The backend echoes the timestamp back as a float
fn timestamp_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(D::Error::custom(format!("invalid timestamp {value}")));
    }
    Ok(value as u64)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArticleResponse {
    #[serde(default)]
    pub found: bool,
    pub articles: String,
    #[serde(default)]
    pub dictionaries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtsMatch {
    pub dict: String,
    pub word: String,
}

impl FtsMatch {
    /// Element id of this match inside the rendered articles
    pub fn anchor_name(&self) -> String {
        format!("{}__{}", self.dict, self.word)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FtsArticleResponse {
    #[serde(default)]
    pub found: bool,
    pub articles: String,
    #[serde(default)]
    pub dictionaries: Vec<FtsMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LibrarySnapshot {
    pub dictionaries: Vec<DictionaryRecord>,
    pub groupings: Groupings,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct GroupsSnapshot {
    pub groups: Vec<Group>,
    pub groupings: Groupings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBody {
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValidBody {
    pub valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountBody {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameBody {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNameBody {
    pub name: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRenameBody {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupLangBody {
    pub name: String,
    pub lang: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupingBody {
    pub dictionary_name: String,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBody {
    pub source: String,
}

/// Body of `POST /management/dictionaries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDictionaryBody {
    #[serde(flatten)]
    pub record: DictionaryRecord,
    pub group_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_dictionary() -> impl Strategy<Value = Dictionary> {
        (".*", ".*", ".*", ".*").prop_map(|(name, display_name, format, filename)| Dictionary {
            name,
            display_name,
            format,
            filename,
        })
    }

    proptest! {
        #[test]
        fn dictionary_survives_snake_case_round_trip(dictionary in any_dictionary()) {
            let record = DictionaryRecord::from(&dictionary);
            prop_assert_eq!(Dictionary::from(record), dictionary);
        }

        #[test]
        fn record_survives_camel_case_round_trip(dictionary in any_dictionary()) {
            let record = DictionaryRecord::from(dictionary);
            let back = DictionaryRecord::from(Dictionary::from(record.clone()));
            prop_assert_eq!(back, record);
        }
    }

    #[test]
    fn suggestion_timestamp_accepts_float_echo() {
        let response: SuggestionResponse =
            serde_json::from_str(r#"{"timestamp": 1700000000123.0, "suggestions": ["apple", ""]}"#)
                .unwrap();
        assert_eq!(response.timestamp, 1_700_000_000_123);
        assert_eq!(response.suggestions, vec!["apple".to_string(), String::new()]);
    }

    #[test]
    fn suggestion_timestamp_rejects_negative() {
        let result =
            serde_json::from_str::<SuggestionResponse>(r#"{"timestamp": -1, "suggestions": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_dictionary_body_is_flat() {
        let body = NewDictionaryBody {
            record: DictionaryRecord {
                dictionary_display_name: "Webster".into(),
                dictionary_name: "webster".into(),
                dictionary_format: "MDict (.mdx)".into(),
                dictionary_filename: "/dicts/webster.mdx".into(),
            },
            group_name: DEFAULT_GROUP_NAME.into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["dictionary_name"], "webster");
        assert_eq!(value["group_name"], "Default Group");
    }

    #[test]
    fn fts_match_anchor() {
        let hit = FtsMatch {
            dict: "oald".into(),
            word: "apple".into(),
        };
        assert_eq!(hit.anchor_name(), "oald__apple");
    }
}
