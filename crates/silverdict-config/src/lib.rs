use std::env;

use serde::{Deserialize, Serialize};

use self::network::NetworkConfig;
use self::search::SearchConfig;
use self::ui::UiConfig;

pub mod network;
pub mod search;
pub mod ui;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub ui: UiConfig,
    pub search: SearchConfig,

    /// Capacity of the ui -> app event channel
    pub event_capacity: usize,
}

impl Config {
    /// Build the config from environment variables, falling back to defaults
    pub fn new() -> Self {
        let event_capacity = env::var("EVENT_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_event_capacity);

        Config {
            network: NetworkConfig::new(),
            ui: UiConfig::new(),
            search: SearchConfig::new(),

            event_capacity,
        }
    }
}

fn default_event_capacity() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            ui: UiConfig::default(),
            search: SearchConfig::default(),
            event_capacity: default_event_capacity(),
        }
    }
}
