//! Execution of scheduled jobs.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use dutybot_config::JobKind;
use dutybot_cron::CronJob;
use dutybot_roster::{RosterStore, WeeklyReport, compose_weekly_report, week_window};
use dutybot_types::OutboundMessage;

use crate::channel::ChannelPlugin;

/// Runs cron jobs against the roster and posts their output.
pub struct JobRunner {
    channel: Arc<dyn ChannelPlugin>,
    store: RosterStore,
    offset: FixedOffset,
}

impl JobRunner {
    pub fn new(channel: Arc<dyn ChannelPlugin>, store: RosterStore, offset: FixedOffset) -> Self {
        Self {
            channel,
            store,
            offset,
        }
    }

    /// Run one job as of `now`.
    pub async fn run(&self, job: &CronJob, now: DateTime<Utc>) -> anyhow::Result<()> {
        let group_id = job
            .group_id
            .as_deref()
            .with_context(|| format!("job {} has no group_id", job.name))?;

        let text = match &job.kind {
            JobKind::PicRoster => self.pic_report(now).await?.text,
            JobKind::Reminder { text } => text.clone(),
        };

        self.channel
            .send(OutboundMessage::to_group(group_id, text))
            .await
            .context("failed to send message to group")?;

        info!(job = %job.name, group_id, "Job message sent");
        Ok(())
    }

    /// Compose this week's PIC report, rotating the roster file.
    pub async fn pic_report(&self, now: DateTime<Utc>) -> anyhow::Result<WeeklyReport> {
        let store = self.store.clone();
        let window = week_window(now, self.offset);

        let report = tokio::task::spawn_blocking(move || compose_weekly_report(&store, &window))
            .await
            .context("roster task panicked")?
            .with_context(|| format!("failed to build PIC report from {}", self.store.path().display()))?;

        for attempt in &report.rotations {
            if let Err(e) = &attempt.result {
                warn!(pic = %attempt.pic, "PIC shown without rotation: {e}");
            }
        }
        Ok(report)
    }

    /// Consume dispatched jobs one at a time until the sender is dropped.
    ///
    /// Running jobs sequentially keeps roster writes single-writer.
    pub async fn run_job_loop(self: Arc<Self>, mut jobs: mpsc::UnboundedReceiver<CronJob>) {
        info!("Job runner started");
        while let Some(job) = jobs.recv().await {
            if let Err(e) = self.run(&job, Utc::now()).await {
                error!(job = %job.name, "Job failed: {e:#}");
            }
        }
        info!("Job runner stopped");
    }
}
