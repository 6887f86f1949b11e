#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the request never got an answer from the backend
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
