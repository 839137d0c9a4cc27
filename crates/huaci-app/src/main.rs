use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use huaci_config::HostConfig;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;


use self::controller::AppController;
use self::state::AppState;

/// Native messaging host for the huaci word lookup extension
#[derive(Debug, Parser)]
#[command(name = "huaci", version)]
struct Cli {
    /// Settings profile (JSON); overrides HUACI_PROFILE
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Browsers pass the extension origin as a positional argument
    #[arg(hide = true)]
    origin: Vec<String>,

    /// Chrome on Windows also passes the calling window handle
    #[arg(long, hide = true)]
    parent_window: Option<i64>,
}

/// stdout carries native messages, so logs always go to stderr
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = HostConfig::new();
    if cli.profile.is_some() {
        config.profile_path = cli.profile;
    }
    if !cli.origin.is_empty() {
        tracing::info!("started by {}", cli.origin.join(" "));
    }
    if let Some(window) = cli.parent_window {
        tracing::debug!("parent window {window}");
    }

    let settings = profile::load_profile(config.profile_path.as_deref())?;
    let state = Arc::new(AppState::new(config, settings)?);
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(tokio::io::stdin(), tokio::io::stdout());

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        _ = controller.cancelled() => {
            tracing::info!("Input closed, shutting down");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("host task exited"),
                Ok(Err(e)) => tracing::error!("host task failed: {e}"),
                Err(e) => tracing::error!("host task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::debug!("task ended with: {e}");
        }
    }

    Ok(())
}
