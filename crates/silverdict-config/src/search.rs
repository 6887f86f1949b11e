use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_group() -> String {
    "Default Group".to_string()
}

fn default_anchor_wait_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Group a fresh session starts in
    #[serde(default = "default_group")]
    pub default_group: String,
    /// Upper bound on waiting for a deep-linked entry to show up
    #[serde(default = "default_anchor_wait_ms")]
    pub anchor_wait_ms: u64,
}

impl SearchConfig {
    pub fn new() -> Self {
        let default_group = env::var("DEFAULT_GROUP").unwrap_or_else(|_| default_group());

        let anchor_wait_ms = env::var("ANCHOR_WAIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_anchor_wait_ms);

        Self {
            default_group,
            anchor_wait_ms,
        }
    }

    pub fn anchor_wait(&self) -> Duration {
        Duration::from_millis(self.anchor_wait_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_group: default_group(),
            anchor_wait_ms: default_anchor_wait_ms(),
        }
    }
}
