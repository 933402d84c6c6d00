use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use leadscan_config::Config;
use tokio::signal;

mod controller;
mod events;
mod logging;
mod state;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

/// Business card scanner
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// JSON config file, defaults to $LEADSCAN_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if args.json_logs {
        config.logging.json = true;
    }
    logging::init_logging(&config.logging)?;

    let channels = config.channels.clone();
    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state, &channels);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Task exited with error during shutdown: {e:#}"),
            Err(e) => tracing::warn!("Task panicked during shutdown: {e}"),
        }
    }

    Ok(())
}
