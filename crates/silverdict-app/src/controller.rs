use kanal::{AsyncReceiver, AsyncSender};
use silverdict_core::controller::ControllerSettings;
use silverdict_core::links::DeepLink;
use silverdict_types::{AppEvent, SurfaceKind};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{Completion, Screen, Services, event_loop};
use crate::io::input_loop;
use crate::ui::Renderer;

/// Centralized channel management
pub struct ChannelSet {
    pub input_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub completions: (AsyncSender<Completion>, AsyncReceiver<Completion>),
}

impl ChannelSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            input_to_app: kanal::bounded_async(capacity),
            // Bursts of responses after a fast typist
            completions: kanal::bounded_async(capacity * 4),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    services: Services,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(services: Services) -> Self {
        let capacity = services.state.config.read().await.event_capacity;
        Self {
            channels: ChannelSet::new(capacity),
            services,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn spawn_tasks(
        &self,
        surface: SurfaceKind,
        deep_link: Option<DeepLink>,
        renderer: Renderer,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        let settings = ControllerSettings::from_config(&*self.services.state.config.read().await);
        let mut screen = Screen::new(
            self.services.clone(),
            settings,
            surface,
            self.channels.completions.0.clone(),
        );
        if let Some(link) = deep_link {
            screen.controller.set_deep_link(link);
        }

        tasks.spawn(event_loop(
            screen,
            renderer,
            self.channels.input_to_app.1.clone(),
            self.channels.completions.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks.spawn(input_loop(
            self.channels.input_to_app.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
