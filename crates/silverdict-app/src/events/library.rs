use silverdict_core::controller::ControllerSettings;
use silverdict_core::workflow::{WorkflowOutcome, run_workflow};
use silverdict_core::workflows::ClearHistory;

use crate::events::Screen;

pub async fn handle_clear_history(screen: &mut Screen) {
    let services = &screen.services;
    let outcome = run_workflow(
        &ClearHistory,
        services.management.as_ref(),
        &services.state,
        &services.alerts,
    )
    .await;

    if outcome == WorkflowOutcome::Applied {
        tracing::info!("History cleared");
        screen.controller.history_updated().await;
    }
}

/// Re-read settings and pull the library again, e.g. after another client changed it
pub async fn handle_reload(screen: &mut Screen) {
    screen.settings = ControllerSettings::from_config(&*screen.services.state.config.read().await);

    let services = &screen.services;
    if let Err(e) = services.state.initialise(services.api.as_ref()).await {
        services
            .alerts
            .failure("app-context-message-failure-initialising", &e);
        return;
    }

    let requests = screen.controller.library_changed().await;
    screen.dispatch(requests);
}
