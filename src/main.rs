//! Headless session daemon for the Cloud IDE extension.
//!
//! Loads the runner config, keeps the session window reconciled against the
//! backend, and bridges one editor surface over stdio. Runs until the
//! surface hangs up or the process is interrupted.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use cloudide_session::session::NoticeLevel;
use cloudide_session::ui::{BridgePrompt, UiBridge, UiUpdate};
use cloudide_session::{
    startup, ExpiryScheduler, RenewalCoordinator, RunnerClient, RunnerConfig, SessionContext,
};

#[derive(Debug, Parser)]
#[command(
    name = "cloudide-sessiond",
    version,
    about = "Session lifecycle daemon for the Cloud IDE extension"
)]
struct Args {
    /// Path to the runner config file (defaults to ~/.cloudide.config)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(RunnerConfig::default_path);
    let config = RunnerConfig::load(&config_path)
        .with_context(|| format!("failed to load runner config from {}", config_path.display()))?;
    if let Some(start) = config.session_start {
        info!("Runner {} provisioned; session start {}", config.runner_id, start);
    }

    let client = Arc::new(RunnerClient::from_config(&config)?);
    let ctx = Arc::new(SessionContext::new(client, &config));

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let prompt = Arc::new(BridgePrompt::new(out_tx.clone()));
    let coordinator = Arc::new(RenewalCoordinator::new(Arc::clone(&ctx), prompt.clone()));
    let scheduler = ExpiryScheduler::new(Arc::clone(&ctx), Arc::clone(&coordinator));

    // First fetch. Failure is not fatal: the store stays empty and ticks
    // stay quiet until a later refresh succeeds.
    if let Err(e) = ctx.refresh().await {
        error!("Error updating runner data: {}", e);
        let _ = out_tx.send(UiUpdate::ShowNotification {
            level: NoticeLevel::Error,
            message: "Could not reach the session backend; session times are unavailable."
                .to_string(),
        });
    }

    if let Some(action) = startup::resolve_startup_file(config.file_path.as_deref()) {
        let _ = out_tx.send(UiUpdate::OpenFile {
            path: action.path,
            markdown_preview: action.markdown_preview,
        });
    }

    scheduler.start();

    let bridge = UiBridge::new(Arc::clone(&ctx), coordinator, prompt, out_tx, out_rx);
    let outcome = tokio::select! {
        result = bridge.run(tokio::io::stdin(), tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted; shutting down");
            Ok(())
        }
    };

    scheduler.stop();
    outcome?;
    Ok(())
}
