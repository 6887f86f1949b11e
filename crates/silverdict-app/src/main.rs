use std::future::Future;
use std::sync::Arc;

use clap::Parser;
use silverdict_api::ApiClient;
use silverdict_config::Config;
use silverdict_core::controller::ControllerSettings;
use silverdict_core::l10n::Strings;
use silverdict_core::links::DeepLink;
use silverdict_core::notify::Alerts;
use silverdict_core::state::AppState;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod controller;
mod events;
mod io;
mod profile;
mod ui;

#[cfg(test)]
mod tests;

use self::cli::{Cli, Command, Surface};
use self::controller::AppController;
use self::events::Services;
use self::ui::{Renderer, TerminalNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Some(Command::NewProfile { name }) = &cli.command {
        profile::init_user_config()?;
        let file = profile::add_profile_from_default(name)?;
        println!("{}", file.display());
        return Ok(());
    }

    let config = load_config(&cli);
    let strings = Strings::new(&config.ui.locale);
    let alerts = Alerts::new(strings.clone(), Arc::new(TerminalNotifier));

    let api = Arc::new(ApiClient::new(&config.network)?);
    tracing::info!("Using backend at {} ({})", api.base_url(), strings.locale());
    let settings = ControllerSettings::from_config(&config);
    let state = Arc::new(AppState::new(config));

    if let Err(e) = state.initialise(api.as_ref()).await {
        if e.is_transport() {
            tracing::error!("No SilverDict server answering at {}", api.base_url());
        }
        alerts.failure("app-context-message-failure-initialising", &e);
    }

    let services = Services::new(api, state, alerts);

    let (surface, open) = match cli.command {
        None => (Surface::Query, None),
        Some(Command::Interactive { surface, open }) => (surface, open),
        Some(command) => return commands::run_command(&services, settings, command).await,
    };

    let deep_link = open.as_deref().map(DeepLink::parse).filter(|l| !l.is_empty());
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let result = run(services, surface, deep_link, Renderer::new(strings), shutdown).await;

    // The stdin reader may still be parked in the blocking pool
    if let Err(e) = &result {
        eprintln!("Error: {e:?}");
    }
    std::process::exit(i32::from(result.is_err()));
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // stdout belongs to the screen
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Profile first, then command-line overrides
fn load_config(cli: &Cli) -> Config {
    let mut config = match &cli.profile {
        Some(name) => profile::load_user_profile(name).unwrap_or_else(|e| {
            tracing::warn!("{:#}, using the environment", e);
            Config::new()
        }),
        None => Config::new(),
    };

    if let Some(prefix) = &cli.api_prefix {
        config.network.api_prefix = prefix.clone();
    }
    if let Some(locale) = &cli.locale {
        config.ui.locale = locale.clone();
    }
    if let Some(group) = &cli.group {
        config.search.default_group = group.clone();
    }
    config
}

pub async fn run(
    services: Services,
    surface: Surface,
    deep_link: Option<DeepLink>,
    renderer: Renderer,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let app = AppController::new(services).await;
    let mut tasks = app.spawn_tasks(surface.into(), deep_link, renderer).await;

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished"),
                Ok(Err(e)) => tracing::error!("Task failed: {:#}", e),
                Err(e) => tracing::error!("Task panicked: {}", e),
            }
        }
    }

    app.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("Task stopped with: {:#}", e);
        }
    }
    Ok(())
}
