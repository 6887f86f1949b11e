use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use silverdict_config::Config;
use silverdict_core::controller::ControllerSettings;
use silverdict_core::l10n::Strings;
use silverdict_core::notify::Alerts;
use silverdict_core::state::AppState;
use silverdict_core::testing::{Backend, FakeApi, RecordingNotifier};
use silverdict_types::SurfaceKind;
use tokio::time::timeout;

use crate::events::{Completion, Screen, Services};

mod input_parse_tests;
mod screen_tests;

pub struct TestApp {
    pub api: Arc<FakeApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub services: Services,
}

impl TestApp {
    pub async fn new(backend: Backend) -> Self {
        let api = Arc::new(FakeApi::new(backend));
        let state = Arc::new(AppState::new(Config::default()));
        state.initialise(api.as_ref()).await.expect("fake backend loads");
        let notifier = Arc::new(RecordingNotifier::default());
        let alerts = Alerts::new(Strings::default(), notifier.clone());
        let services = Services::new(api.clone(), state, alerts);
        Self {
            api,
            notifier,
            services,
        }
    }

    pub fn screen(&self, surface: SurfaceKind) -> (Screen, AsyncReceiver<Completion>) {
        let (done_tx, done_rx) = kanal::unbounded_async();
        let settings = ControllerSettings::from_config(&Config::default());
        let screen = Screen::new(self.services.clone(), settings, surface, done_tx);
        (screen, done_rx)
    }
}

pub async fn next_completion(done_rx: &AsyncReceiver<Completion>) -> Completion {
    match timeout(Duration::from_secs(2), done_rx.recv()).await {
        Ok(Ok(completion)) => completion,
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - completion never arrived!"),
    }
}
