//! Resolve → collect → push → classify.

use shared::api::{SyncReport, SyncScope};
use shared::{Clock, WeekData, WeekWindow};
use std::fmt;
use std::sync::Arc;

use crate::calendar::EventCollector;
use crate::dispatcher::SyncDispatcher;
use crate::roster::Roster;

/// Stages of a single week's sync attempt; every failure ends in `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Idle,
    Collecting,
    Pushing,
    Classifying,
    Done,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Pushing => "pushing",
            Self::Classifying => "classifying",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// The week aggregation and sync pipeline
pub struct WeekSync {
    roster: Roster,
    collector: EventCollector,
    dispatcher: SyncDispatcher,
    clock: Arc<dyn Clock>,
}

impl WeekSync {
    pub fn new(
        roster: Roster,
        collector: EventCollector,
        dispatcher: SyncDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            roster,
            collector,
            dispatcher,
            clock,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Collect the week at `week_offset` from now without pushing anything
    pub async fn fetch_week(&self, week_offset: i64) -> WeekData {
        let window = WeekWindow::resolve(self.clock.now(), week_offset);
        self.collect(&window).await
    }

    /// Sync this week, then ask the endpoint to classify it
    pub async fn sync_current_week(&self) -> SyncReport {
        self.sync_week(0, true).await
    }

    /// Re-sync last week to pick up late entries; never classifies
    pub async fn sync_last_week(&self) -> SyncReport {
        self.sync_week(-1, false).await
    }

    /// Current week then last week. A failed first run does not stop the second.
    pub async fn sync_all(&self) -> Vec<SyncReport> {
        vec![self.sync_current_week().await, self.sync_last_week().await]
    }

    pub async fn run(&self, scope: SyncScope) -> Vec<SyncReport> {
        match scope {
            SyncScope::Current => vec![self.sync_current_week().await],
            SyncScope::Last => vec![self.sync_last_week().await],
            SyncScope::All => self.sync_all().await,
        }
    }

    async fn collect(&self, window: &WeekWindow) -> WeekData {
        WeekData {
            week: window.week_key.clone(),
            events: self.collector.collect(window, &self.roster).await,
        }
    }

    async fn sync_week(&self, week_offset: i64, classify: bool) -> SyncReport {
        let window = WeekWindow::resolve(self.clock.now(), week_offset);
        let week = window.week_key.as_str();
        tracing::debug!("{}: {} -> {}", week, SyncStage::Idle, SyncStage::Collecting);

        let data = self.collect(&window).await;
        tracing::debug!("{}: {} -> {}", week, SyncStage::Collecting, SyncStage::Pushing);

        let push = self.dispatcher.push_week(&data).await;

        let mut classify_requested = false;
        if classify {
            let settings = self.dispatcher.settings();
            if settings.sync_url.is_some() {
                tracing::debug!("{}: {} -> {}", week, SyncStage::Pushing, SyncStage::Classifying);
                classify_requested = self.dispatcher.trigger_classify(week, &settings).await;
            }
        }

        tracing::debug!("{}: -> {}", week, SyncStage::Done);
        tracing::info!("Synced {} events for {}", data.events.len(), week);

        SyncReport {
            week: data.week,
            event_count: data.events.len(),
            push,
            classify_requested,
        }
    }
}
