//! Calendar backends and event collection.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::RawEvent;

pub mod collector;
pub mod google;

pub use collector::EventCollector;
pub use google::GoogleCalendarBackend;

/// A source of raw events, keyed by calendar id
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Events whose interval intersects `[start, end]`, in backend order.
    ///
    /// Fails when the calendar cannot be found or read.
    async fn events_between(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>>;
}
