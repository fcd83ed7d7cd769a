use anyhow::Context;
use chrono::Utc;

use dutybot_config::{DutyBotConfig, JobKind};
use dutybot_cron::CronJob;
use dutybot_gateway::jobs::JobRunner;
use dutybot_roster::{RosterStore, current_week, preview_weekly_report};

/// Job run when `--job` is not given.
pub const DEFAULT_JOB: &str = "pic-roster";

/// Text the job would post, without rotating the roster or sending anything.
pub fn dry_run(config: &DutyBotConfig, job_name: &str) -> anyhow::Result<String> {
    let job = find_job(config, job_name)?;
    match &job.kind {
        JobKind::PicRoster => {
            let store = RosterStore::new(&config.roster.file);
            let window = current_week(config.utc_offset()?);
            preview_weekly_report(&store, &window)
                .with_context(|| format!("failed to read roster {}", store.path().display()))
        }
        JobKind::Reminder { text } => Ok(text.clone()),
    }
}

/// Run one job immediately through the SeaTalk channel.
pub async fn run_remind(config: DutyBotConfig, job_name: String) -> anyhow::Result<()> {
    let job = find_job(&config, &job_name)?;
    let channel = dutybot_channel_seatalk::create_seatalk_channel("seatalk".into(), &config.seatalk)?;
    let runner = JobRunner::new(
        channel,
        RosterStore::new(&config.roster.file),
        config.utc_offset()?,
    );

    runner.run(&job, Utc::now()).await?;
    println!("Job {job_name} sent");
    Ok(())
}

fn find_job(config: &DutyBotConfig, name: &str) -> anyhow::Result<CronJob> {
    let job = config
        .job(name)
        .with_context(|| format!("no job named {name} in config"))?;
    Ok(CronJob::from_config(job)?)
}
