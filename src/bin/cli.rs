// src/bin/cli.rs

//! Vacancy Crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use vacancy_crawler::{
    error::Result,
    models::Config,
    pipeline,
    services::HhClient,
    storage::{LocalStorage, SnapshotStorage},
};

/// Vacancy Crawler - job listing snapshots and salary dynamics
#[derive(Parser, Debug)]
#[command(
    name = "vacancy-crawler",
    version,
    about = "Collects vacancies and compares snapshot statistics"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the snapshot data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch campaigns and write today's snapshot
    Collect {
        /// Run only the named campaign (repeatable)
        #[arg(long = "campaign")]
        campaigns: Vec<String>,
    },

    /// Statistics for one snapshot date
    Analyze {
        /// Snapshot date (default: latest snapshot)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Compare two snapshot dates
    Compare {
        #[arg(long)]
        baseline: NaiveDate,

        #[arg(long)]
        current: NaiveDate,
    },

    /// Validate the configuration file
    Validate,

    /// List snapshots in the data directory
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Validate = cli.command {
        pipeline::run_validate(&cli.config)?;
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = &cli.data_dir {
        config.paths.data_dir = dir.display().to_string();
    }
    config.validate()?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let storage = LocalStorage::new(&config.paths.data_dir, &config.paths.report_dir);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Collect { campaigns } => {
            let client = HhClient::new(config.api.clone())?;
            let summary =
                pipeline::run_collect(&config, &storage, &client, &campaigns, Utc::now(), today)
                    .await?;
            log::info!(
                "Collected {} unique listings across {} campaigns",
                summary.total_unique(),
                summary.campaigns.len()
            );
        }

        Command::Analyze { date } => {
            let date = match date {
                Some(date) => date,
                None => pipeline::latest_snapshot(&storage).await?.unwrap_or(today),
            };
            pipeline::run_analyze(&config, &storage, date).await?;
        }

        Command::Compare { baseline, current } => {
            pipeline::run_compare(&config, &storage, baseline, current).await?;
        }

        Command::Info => {
            log::info!("Data directory: {}", config.paths.data_dir);
            log::info!("Report directory: {}", config.paths.report_dir);

            let snapshots = storage.list_snapshots().await?;
            if snapshots.is_empty() {
                log::info!("No snapshot found yet.");
            }
            for snapshot in snapshots {
                log::info!("{}: {} file(s)", snapshot.date, snapshot.files.len());
                for file in snapshot.files {
                    log::info!("    {}", file);
                }
            }
        }

        Command::Validate => {}
    }

    log::info!("Done!");

    Ok(())
}
