//! dutybot-cron: weekly job scheduling.
//!
//! Jobs come from configuration and are evaluated against cron expressions
//! in the roster's fixed UTC offset. Due jobs are pushed onto a channel; the
//! receiver runs them one at a time.

pub mod scheduler;

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};

use dutybot_config::{JobConfig, JobKind};

#[derive(Debug, thiserror::Error)]
pub enum CronError {
    #[error("invalid schedule {expr:?} for job {job}: {source}")]
    InvalidSchedule {
        job: String,
        expr: String,
        source: cron::error::Error,
    },
}

/// A scheduled job with its parsed expression and run bookkeeping.
#[derive(Debug, Clone)]
pub struct CronJob {
    /// Unique job name.
    pub name: String,
    /// Cron expression as configured.
    pub expression: String,
    schedule: cron::Schedule,
    /// What to do when the job fires.
    pub kind: JobKind,
    /// Group chat the job posts into.
    pub group_id: Option<String>,
    /// Whether this job is enabled.
    pub enabled: bool,
    /// Last execution time.
    pub last_run: Option<DateTime<Utc>>,
    /// Next scheduled execution time.
    pub next_run: Option<DateTime<Utc>>,
}

impl CronJob {
    /// Parse a job definition. `next_run` is left unset.
    pub fn from_config(config: &JobConfig) -> Result<Self, CronError> {
        let schedule =
            cron::Schedule::from_str(&config.schedule).map_err(|source| {
                CronError::InvalidSchedule {
                    job: config.name.clone(),
                    expr: config.schedule.clone(),
                    source,
                }
            })?;

        Ok(Self {
            name: config.name.clone(),
            expression: config.schedule.clone(),
            schedule,
            kind: config.kind.clone(),
            group_id: config.group_id.clone(),
            enabled: config.enabled,
            last_run: None,
            next_run: None,
        })
    }

    /// First fire time strictly after `after`, evaluated in `offset`.
    pub fn next_after(&self, after: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&offset))
            .next()
            .map(|t| t.with_timezone(&Utc))
    }
}
