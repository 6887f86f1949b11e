pub mod activator;
pub mod controller;
pub mod dispatcher;
pub mod document;
pub mod encoding;
pub mod error;
pub mod l10n;
pub mod language;
pub mod library;
pub mod links;
pub mod navigation;
pub mod notify;
pub mod render;
pub mod selection;
pub mod session;
pub mod state;
pub mod suggestions;
pub mod view;
pub mod workflow;
pub mod workflows;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
