//! explored - follows an MPRIS player, records explored tracks and skips them.
//!
//! `explored run` starts the tracking daemon; every other invocation is a CLI
//! command operating on the shared state file.

use std::{env, error::Error, process, sync::Arc};

use explored::{
    cli::{CliService, formatting::Style},
    config::{Config, ConfigPaths},
    services::{MprisHost, common::Property},
    store::{JsonFileStore, StateWatcher},
    tracing_config,
    tracker::{self, Clock, SystemClock, Tracker, TrackerHost, TrackerSettings},
};
use futures::StreamExt;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("run") => run_daemon().await,
        _ => run_cli_command(args.get(1..).unwrap_or(&[])).await,
    };

    if let Err(e) = result {
        eprintln!("{}", Style::Error.paint(&e.to_string()));
        process::exit(1);
    }
}

fn load_config() -> explored::Result<Config> {
    let path = ConfigPaths::main_config()?;
    Config::load(&path)
}

/// Executes CLI commands through the CliService.
///
/// Arguments are `<category> <command> [args]`; a missing category prints
/// the help overview.
///
/// # Errors
/// Returns error if configuration or state cannot be loaded, or the command fails.
async fn run_cli_command(args: &[String]) -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    tracing_config::init(config.general.log_level)?;

    let store = Arc::new(JsonFileStore::open(ConfigPaths::state_file()?)?);
    let cli_service = CliService::new(store, config);

    let category = args.first().map(|s| s.as_str()).unwrap_or("help");
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    let output = cli_service
        .execute_command(category, command, command_args)
        .await?;

    if !output.trim().is_empty() {
        println!("{output}");
    }

    Ok(())
}

/// Runs the tracking daemon until a fatal error or Ctrl-C.
///
/// # Errors
/// Returns error if startup fails or the tracker stops on bad player data.
async fn run_daemon() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    let _log_guard = tracing_config::init_with_file(config.general.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting explored");

    track(config).await?;
    Ok(())
}

async fn track(config: Config) -> explored::Result<()> {
    let store = Arc::new(JsonFileStore::open(ConfigPaths::state_file()?)?);
    let enabled = Property::new(tracker::load_enabled(store.as_ref()));
    let external_changes = StateWatcher::spawn(store.clone(), enabled.clone())?;
    log_enabled_changes(&enabled);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let host = Arc::new(MprisHost::connect(&config.player, clock.clone()).await?);

    let tracker = Tracker::new(
        TrackerSettings::from(&config),
        TrackerHost {
            provider: host.clone(),
            controller: host.clone(),
            store,
            enabled: Arc::new(enabled),
            clock,
        },
    )
    .with_external_changes(external_changes);

    tokio::select! {
        result = tracker.run(|| host.is_ready()) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down");
        }
    }

    Ok(())
}

fn log_enabled_changes(enabled: &Property<bool>) {
    let mut changes = Box::pin(enabled.watch().skip(1));

    tokio::spawn(async move {
        while let Some(enabled) = changes.next().await {
            if enabled {
                info!("Tracking enabled");
            } else {
                info!("Tracking disabled");
            }
        }
    });
}
