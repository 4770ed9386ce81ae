use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use polling_services::backfill::{push_cached_week, DEFAULT_CHUNK_SIZE};
use polling_services::clock::WallClock;
use polling_services::config::PollingConfig;
use polling_services::roster::Roster;
use serde::Serialize;
use shared::api::SyncScope;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Pull, slice and sync calendar weeks from the command line")]
#[command(
    long_about = "A command-line interface to the week relay pipeline.\n\n\
    Reads the same environment and roster file as the server, so a week can be\n\
    inspected or pushed by hand without starting the backend."
)]
struct Cli {
    /// Path to the calendar roster file.
    #[arg(short, long, value_name = "FILE", env = "ROSTER_PATH")]
    roster: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a week of events as JSON without pushing it
    Week {
        /// Weeks relative to the current one; -1 is last week
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Treat this date as "today" instead of the real clock
        #[arg(long, value_name = "YYYY-MM-DD")]
        as_of: Option<NaiveDate>,
    },

    /// Print a slice of an already rendered week document
    ///
    /// The document may be a full week object or a bare event array, as
    /// written by `week`. Ranges past the end are clipped.
    Chunk {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, default_value_t = 0)]
        start: usize,

        #[arg(short, long, default_value_t = 0)]
        count: usize,
    },

    /// Push a cached week document to the sync endpoint, then classify it
    ///
    /// Events are sent in chunks of `--chunk-size`. The week key comes from
    /// `--week`, else from the document's own `week` field.
    Push {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_name = "YYYY-Www")]
        week: Option<String>,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Push weeks to the sync endpoint now
    Sync {
        #[arg(value_enum, default_value_t = Scope::All)]
        scope: Scope,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scope {
    Current,
    Last,
    All,
}

impl From<Scope> for SyncScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Current => SyncScope::Current,
            Scope::Last => SyncScope::Last,
            Scope::All => SyncScope::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_services=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Week { offset, as_of } => {
            let config = load_config(cli.roster)?;
            let mut clock = WallClock::new(config.calendar_timezone);
            if let Some(date) = as_of {
                clock = clock.pinned_at(date.and_time(chrono::NaiveTime::default()));
            }
            let roster = Roster::load(&config.roster_path).context("Failed to load roster")?;
            let pipeline =
                polling_services::build_with_clock(&config, roster, Arc::new(clock)).await?;

            print_json(&pipeline.fetch_week(offset).await)?;
        }
        Commands::Chunk { file, start, count } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chunk = shared::extract_chunk_from_document(&content, start, count)
                .context("Failed to parse event document")?;

            print_json(&chunk)?;
        }
        Commands::Push {
            file,
            week,
            chunk_size,
        } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let dispatcher = polling_services::build_dispatcher();
            let report =
                push_cached_week(&dispatcher, week.as_deref(), &content, chunk_size).await?;

            print_json(&report)?;
        }
        Commands::Sync { scope } => {
            let config = load_config(cli.roster)?;
            let pipeline = polling_services::build_pipeline(&config).await?;
            let reports = pipeline.run(scope.into()).await;

            print_json(&reports)?;
        }
    }

    Ok(())
}

fn load_config(roster: Option<PathBuf>) -> anyhow::Result<PollingConfig> {
    let mut config = PollingConfig::from_env()?;
    if let Some(path) = roster {
        config.roster_path = path;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
