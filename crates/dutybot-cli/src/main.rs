mod remind;
mod roster;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dutybot", about = "SeaTalk duty roster bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server and the job scheduler
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one scheduled job now
    Remind {
        /// Job name from config
        #[arg(short, long, default_value = remind::DEFAULT_JOB)]
        job: String,

        /// Print the message instead of sending it; the roster is not rotated
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect or edit the roster file
    Roster {
        #[command(subcommand)]
        command: RosterCommands,
    },
    /// Check system health
    Health,
}

#[derive(Subcommand)]
enum RosterCommands {
    /// Print this week's PICs and the full schedule
    Show {
        /// Roster file (overrides config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Move the previous PIC of `pic` one week past the latest date
    Rotate {
        /// Current PIC
        #[arg(long)]
        pic: String,

        /// Roster file (overrides config)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = dutybot_config::load_config().context("failed to load config")?;

    match cli.command {
        Commands::Serve { port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                let channel = dutybot_channel_seatalk::create_seatalk_channel(
                    "seatalk".into(),
                    &config.seatalk,
                )?;
                dutybot_gateway::start_gateway(config, channel, port).await
            })?;
        }
        Commands::Remind { job, dry_run } => {
            if dry_run {
                println!("{}", remind::dry_run(&config, &job)?);
            } else {
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(remind::run_remind(config, job))?;
            }
        }
        Commands::Roster { command } => match command {
            RosterCommands::Show { file } => {
                let file = file.unwrap_or_else(|| config.roster.file.clone());
                println!(
                    "{}",
                    roster::show(file, config.utc_offset()?, chrono::Utc::now())?
                );
            }
            RosterCommands::Rotate { pic, file } => {
                let file = file.unwrap_or_else(|| config.roster.file.clone());
                println!("{}", roster::rotate(file, &pic)?);
            }
        },
        Commands::Health => {
            println!("dutybot is healthy");
            println!("  gateway port: {}", config.gateway.port);
            println!("  roster file: {}", config.roster.file.display());
            println!("  utc offset: {:+}h", config.roster.utc_offset_hours);
            println!(
                "  seatalk credentials: {}",
                if config.seatalk.app_id.is_empty() {
                    "missing"
                } else {
                    "set"
                }
            );
            for job in &config.jobs {
                println!(
                    "  job {}: \"{}\" group={} enabled={}",
                    job.name,
                    job.schedule,
                    job.group_id.as_deref().unwrap_or("-"),
                    job.enabled
                );
            }
        }
    }

    Ok(())
}
