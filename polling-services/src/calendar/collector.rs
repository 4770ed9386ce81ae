use shared::{CalendarSource, Clock, Event, WeekWindow};
use std::sync::Arc;

use super::CalendarBackend;

/// Gathers a week's events from every roster calendar, one calendar at a time
pub struct EventCollector {
    backend: Arc<dyn CalendarBackend>,
    clock: Arc<dyn Clock>,
}

impl EventCollector {
    pub fn new(backend: Arc<dyn CalendarBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// Normalized events of `window`, in roster order then backend order.
    ///
    /// A calendar that fails to read contributes nothing; the remaining
    /// calendars are still collected.
    pub async fn collect(&self, window: &WeekWindow, roster: &[CalendarSource]) -> Vec<Event> {
        let (start, end) = window.utc_bounds(self.clock.as_ref());
        let mut events = Vec::new();

        for source in roster {
            match self.backend.events_between(&source.id, start, end).await {
                Ok(raw) => {
                    tracing::debug!(
                        "Read {} events from {} for {}",
                        raw.len(),
                        source.name,
                        window.week_key
                    );
                    events.extend(raw.into_iter().map(|r| Event::normalize(&source.name, r)));
                }
                Err(e) => {
                    tracing::warn!("Error reading {}: {:#}", source.name, e);
                }
            }
        }

        events
    }
}
