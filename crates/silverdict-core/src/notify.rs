use std::fmt::Display;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::l10n::Strings;

/// Blocking, user-visible notification
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Localised alerts on top of a [`Notifier`]
#[derive(Clone)]
pub struct Alerts {
    strings: Strings,
    notifier: Arc<dyn Notifier>,
}

impl Alerts {
    pub fn new(strings: Strings, notifier: Arc<dyn Notifier>) -> Self {
        Self { strings, notifier }
    }

    /// Alert for a failed request: localised headline, then the error
    pub fn failure(&self, key: &str, error: &dyn Display) {
        let message = format!("{}\n{}", self.strings.get(key), error);
        tracing::warn!("{}", message.replace('\n', ": "));
        self.notifier.alert(&message);
    }

    pub fn validation(&self, error: &ValidationError) {
        let message = self
            .strings
            .format(error.message_key(), &error.message_args());
        tracing::warn!("validation failed: {}", error);
        self.notifier.alert(&message);
    }
}
