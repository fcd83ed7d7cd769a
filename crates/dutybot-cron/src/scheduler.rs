//! Cron job scheduler: evaluates cron expressions and dispatches due jobs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dutybot_config::JobConfig;

use crate::{CronError, CronJob};

/// How often the scheduler checks for due jobs.
pub const TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Manages cron job scheduling.
pub struct CronManager {
    offset: FixedOffset,
    jobs: RwLock<Vec<CronJob>>,
}

impl CronManager {
    /// Parse every job and compute its first run after `now`.
    pub fn new(
        configs: &[JobConfig],
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> Result<Self, CronError> {
        let mut jobs = Vec::with_capacity(configs.len());
        for config in configs {
            let mut job = CronJob::from_config(config)?;
            job.next_run = job.next_after(now, offset);
            jobs.push(job);
        }
        info!("Loaded {} cron jobs", jobs.len());

        Ok(Self {
            offset,
            jobs: RwLock::new(jobs),
        })
    }

    /// List all jobs.
    pub async fn list_jobs(&self) -> Vec<CronJob> {
        self.jobs.read().await.clone()
    }


    /// Jobs that are enabled and due at `now`.
    pub async fn get_due_jobs(&self, now: DateTime<Utc>) -> Vec<CronJob> {
        let jobs = self.jobs.read().await;
        jobs.iter()
            .filter(|j| j.enabled && j.next_run.is_some_and(|next| next <= now))
            .cloned()
            .collect()
    }

    /// Record a run at `now` and schedule the next one.
    pub async fn mark_ran(&self, name: &str, now: DateTime<Utc>) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.iter_mut().find(|j| j.name == name) {
            job.last_run = Some(now);
            job.next_run = job.next_after(now, self.offset);
        }
    }

    /// Start the scheduler loop (runs until cancelled or the receiver is dropped).
    pub async fn run_scheduler(
        self: Arc<Self>,
        task_sender: mpsc::UnboundedSender<CronJob>,
        cancel: CancellationToken,
    ) {
        info!("Cron scheduler started");
        loop {
            let now = Utc::now();
            for job in self.get_due_jobs(now).await {
                info!(job = %job.name, schedule = %job.expression, "Dispatching cron job");
                self.mark_ran(&job.name, now).await;
                if task_sender.send(job).is_err() {
                    warn!("Cron job receiver closed, stopping scheduler");
                    return;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(TICK_INTERVAL) => {},
            }
        }
        info!("Cron scheduler stopped");
    }
}
