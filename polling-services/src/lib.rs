//! Week aggregation and sync pipeline.
//!
//! Collects a week's events from every calendar in the roster and relays them
//! to the remote collection endpoint, followed by a classify trigger.

pub mod backfill;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod pipeline;
pub mod roster;
pub mod scheduler;
pub mod transport;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::calendar::{EventCollector, GoogleCalendarBackend};
use crate::clock::WallClock;
use crate::config::{EnvSettings, PollingConfig};
use crate::dispatcher::SyncDispatcher;
use crate::roster::Roster;
use crate::transport::HttpTransport;

pub use crate::pipeline::WeekSync;

/// Wire the production pipeline: roster file, Google Calendar backend,
/// environment-driven sync settings and the reqwest transport.
pub async fn build_pipeline(config: &PollingConfig) -> Result<WeekSync> {
    let roster = Roster::load(&config.roster_path)
        .with_context(|| format!("Failed to load roster from {}", config.roster_path.display()))?;
    if roster.is_empty() {
        tracing::warn!("Roster {} lists no calendars", config.roster_path.display());
    }
    tracing::info!("Loaded roster with {} calendars", roster.len());

    let clock = Arc::new(WallClock::new(config.calendar_timezone));
    build_with_clock(config, roster, clock).await
}

/// Same as [`build_pipeline`] with an explicit roster and clock
pub async fn build_with_clock(
    config: &PollingConfig,
    roster: Roster,
    clock: Arc<WallClock>,
) -> Result<WeekSync> {
    let backend = GoogleCalendarBackend::new(&config.google, clock.clone())
        .await
        .context("Failed to initialize Google Calendar backend")?;

    Ok(WeekSync::new(
        roster,
        EventCollector::new(Arc::new(backend), clock.clone()),
        build_dispatcher(),
        clock,
    ))
}

/// Dispatcher over HTTP with settings read from the environment
pub fn build_dispatcher() -> SyncDispatcher {
    SyncDispatcher::new(Arc::new(HttpTransport::default()), Arc::new(EnvSettings))
}
