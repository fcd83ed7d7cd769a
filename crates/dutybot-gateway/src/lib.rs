//! dutybot-gateway: webhook server and job runtime.
//!
//! Provides:
//! - `POST /event-callback` for SeaTalk event subscriptions
//! - `GET /health`
//! - the cron scheduler and the sequential job runner

pub mod channel;
pub mod handlers;
pub mod jobs;
pub mod signature;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dutybot_config::DutyBotConfig;
use dutybot_cron::scheduler::CronManager;
use dutybot_roster::RosterStore;

use channel::ChannelPlugin;
use jobs::JobRunner;

/// Shared gateway state.
pub struct GatewayState {
    pub channel: Arc<dyn ChannelPlugin>,
    /// Canned reply to subscriber messages and group mentions.
    pub reply_text: String,
    /// Callback signing secret; signatures are not checked when `None`.
    pub signing_secret: Option<String>,
}

/// Build the HTTP router.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/event-callback", post(handlers::event_callback_handler))
        .with_state(state)
}

/// Start the gateway: cron scheduler, job runner, and HTTP server.
///
/// Runs until ctrl-c.
pub async fn start_gateway(
    config: DutyBotConfig,
    channel: Arc<dyn ChannelPlugin>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    let port = port_override.unwrap_or(config.gateway.port);
    let offset = config.utc_offset()?;

    if let Err(e) = channel.start().await {
        warn!(channel_id = channel.channel_id(), "Channel start failed, will retry on send: {e:#}");
    }

    let cancel = CancellationToken::new();

    let cron = Arc::new(
        CronManager::new(&config.jobs, offset, Utc::now()).context("invalid job schedule")?,
    );
    let runner = Arc::new(JobRunner::new(
        channel.clone(),
        RosterStore::new(&config.roster.file),
        offset,
    ));
    let (job_tx, job_rx) = mpsc::unbounded_channel();
    tokio::spawn(runner.run_job_loop(job_rx));
    tokio::spawn(cron.clone().run_scheduler(job_tx, cancel.child_token()));

    for job in cron.list_jobs().await {
        info!(
            job = %job.name,
            schedule = %job.expression,
            next_run = ?job.next_run,
            enabled = job.enabled,
            "Scheduled job"
        );
    }

    let state = Arc::new(GatewayState {
        channel,
        reply_text: config.reply_text.clone(),
        signing_secret: config.seatalk.signing_secret.clone(),
    });

    let addr: SocketAddr = format!("{}:{port}", config.gateway.host).parse()?;
    info!("Gateway listening on {addr}");
    info!("  Callback: http://{addr}/event-callback");
    info!("  Health:   http://{addr}/health");
    info!("  Roster:   {}", config.roster.file.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
            cancel.cancel();
        })
        .await?;

    Ok(())
}
