use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_api_prefix() -> String {
    "http://127.0.0.1:2628/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Where the backend lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let api_prefix = env::var("SILVERDICT_API_PREFIX").unwrap_or_else(|_| default_api_prefix());

        let timeout_seconds = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        Self {
            api_prefix,
            timeout_seconds,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Prefix without a trailing slash, so paths can be appended directly
    pub fn base_url(&self) -> &str {
        self.api_prefix.trim_end_matches('/')
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_prefix: default_api_prefix(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = NetworkConfig {
            api_prefix: "http://localhost:2628/api/".into(),
            timeout_seconds: 5,
        };
        assert_eq!(config.base_url(), "http://localhost:2628/api");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
