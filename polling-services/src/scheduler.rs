use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::pipeline::WeekSync;

/// Runs the full sync (current week, then last week) on a fixed interval
pub struct SyncScheduler {
    pipeline: Arc<WeekSync>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(pipeline: Arc<WeekSync>, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    pub async fn run(&self) {
        let mut ticker = time::interval(self.interval);
        // A slow cycle delays the next one instead of bunching ticks up
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        tracing::info!("Sync scheduler started (interval: {:?})", self.interval);

        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    async fn run_cycle(&self) {
        tracing::debug!("Running sync cycle");

        for report in self.pipeline.sync_all().await {
            tracing::info!(
                "Cycle result for {}: {} events, push {:?}, classify requested: {}",
                report.week,
                report.event_count,
                report.push,
                report.classify_requested
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CalendarSource;

    use crate::calendar::collector::tests::{utc_clock, StubBackend};
    use crate::calendar::EventCollector;
    use crate::dispatcher::tests::{configured, RecordingTransport};
    use crate::dispatcher::SyncDispatcher;
    use crate::roster::Roster;

    #[tokio::test(start_paused = true)]
    async fn test_each_tick_runs_sync_all() {
        let clock = utc_clock();
        let transport = Arc::new(RecordingTransport::default());
        let pipeline = WeekSync::new(
            Roster::new(vec![CalendarSource::new("Ada", "ada@example.com")]).unwrap(),
            EventCollector::new(
                Arc::new(StubBackend::default().with("ada@example.com", &["standup"])),
                clock.clone(),
            ),
            SyncDispatcher::new(transport.clone(), Arc::new(configured())),
            clock,
        );
        let scheduler = SyncScheduler::new(Arc::new(pipeline), Duration::from_secs(60));

        let handle = tokio::spawn(async move { scheduler.run().await });

        // First tick fires immediately, the second after one interval
        time::sleep(Duration::from_secs(61)).await;
        handle.abort();

        // push + classify + push, twice
        assert_eq!(transport.urls().len(), 6);
    }
}
