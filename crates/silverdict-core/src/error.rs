use silverdict_api::ApiError;

/// User input rejected before (or by) the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Group {0} already exists")]
    DuplicateGroup(String),

    #[error("Source {0} is already registered")]
    DuplicateSource(String),

    #[error("Dictionary {0} already exists")]
    DuplicateDictionary(String),

    #[error("Unknown dictionary: {0}")]
    UnknownDictionary(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0} is not a valid ISO 639-1 language code")]
    InvalidLanguageCode(String),

    #[error("The default group cannot be renamed or deleted")]
    ProtectedGroup,

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("Invalid size: {0}")]
    InvalidSize(i64),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Dictionary info rejected by the backend")]
    InvalidDictionary,

    #[error("Source rejected by the backend")]
    InvalidSource,
}

impl ValidationError {
    /// Localisation key of the alert shown for this error
    pub fn message_key(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "alert-empty-name",
            ValidationError::DuplicateGroup(_) => "alert-duplicate-group",
            ValidationError::DuplicateSource(_) => "alert-duplicate-source",
            ValidationError::DuplicateDictionary(_) => "alert-duplicate-dictionary",
            ValidationError::UnknownDictionary(_) => "alert-unknown-dictionary",
            ValidationError::UnsupportedFormat(_) => "alert-unsupported-format",
            ValidationError::InvalidLanguageCode(_) => "alert-invalid-language-code",
            ValidationError::ProtectedGroup => "alert-default-group-protected",
            ValidationError::UnknownGroup(_) => "alert-unknown-group",
            ValidationError::InvalidSize(_) => "alert-invalid-size",
            ValidationError::MissingField(_) => "alert-missing-field",
            ValidationError::InvalidDictionary => "alert-invalid-dictionary",
            ValidationError::InvalidSource => "alert-invalid-source",
        }
    }

    /// Values substituted into the localised message
    pub fn message_args(&self) -> Vec<String> {
        match self {
            ValidationError::DuplicateGroup(v)
            | ValidationError::DuplicateSource(v)
            | ValidationError::DuplicateDictionary(v)
            | ValidationError::UnknownDictionary(v)
            | ValidationError::UnsupportedFormat(v)
            | ValidationError::InvalidLanguageCode(v)
            | ValidationError::UnknownGroup(v) => vec![v.clone()],
            ValidationError::InvalidSize(size) => vec![size.to_string()],
            ValidationError::MissingField(field) => vec![field.to_string()],
            _ => Vec::new(),
        }
    }
}

/// Failure of a management workflow after local validation passed
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Rejected(#[from] ValidationError),
}
