use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use google_calendar3::api::{Event as GoogleEvent, EventDateTime};
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use shared::{Clock, RawEvent};
use std::path::Path;
use std::sync::Arc;

use super::CalendarBackend;
use crate::config::GoogleCalendarConfig;

const PAGE_SIZE: i32 = 250;

/// Reads events from Google Calendar for any calendar the account can see
pub struct GoogleCalendarBackend {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    clock: Arc<dyn Clock>,
}

impl GoogleCalendarBackend {
    pub async fn new(config: &GoogleCalendarConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        // Already installed by an earlier backend in this process is fine
        let _ = rustls::crypto::ring::default_provider().install_default();

        let secret =
            google_calendar3::yup_oauth2::read_application_secret(&config.credentials_path)
                .await
                .context("Failed to read OAuth credentials")?;

        let auth = google_calendar3::yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            google_calendar3::yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(Path::new(&config.token_cache_path))
        .build()
        .await
        .context("Failed to build authenticator")?;

        let connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("Failed to load native TLS roots")?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = CalendarHub::new(client, auth);

        Ok(Self { hub, clock })
    }
}

/// Map a Google event onto [`RawEvent`]; `None` when it lacks a start or end
fn to_raw(event: GoogleEvent, clock: &dyn Clock) -> Option<RawEvent> {
    let start = instant(event.start.as_ref(), clock)?;
    let end = instant(event.end.as_ref(), clock)?;
    let all_day = event
        .start
        .as_ref()
        .is_some_and(|s| s.date_time.is_none() && s.date.is_some());

    Some(RawEvent {
        my_status: my_status(&event),
        title: event.summary,
        start,
        end,
        description: event.description,
        location: event.location,
        all_day: Some(all_day),
    })
}

/// Timed events carry an instant; all-day events only a local date
fn instant(at: Option<&EventDateTime>, clock: &dyn Clock) -> Option<DateTime<Utc>> {
    let at = at?;
    at.date_time
        .or_else(|| at.date.map(|date| clock.to_utc(date.and_time(NaiveTime::default()))))
}

/// The calendar owner's response: their attendee entry, "owner" when they
/// organised it, else the event's own status.
fn my_status(event: &GoogleEvent) -> Option<String> {
    let attendee_status = event
        .attendees
        .as_ref()
        .and_then(|attendees| attendees.iter().find(|a| a.self_ == Some(true)))
        .and_then(|me| me.response_status.clone());

    let organizer = event
        .organizer
        .as_ref()
        .is_some_and(|o| o.self_ == Some(true));

    attendee_status
        .or_else(|| organizer.then(|| "owner".to_string()))
        .or_else(|| event.status.clone())
}

#[async_trait]
impl CalendarBackend for GoogleCalendarBackend {
    async fn events_between(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .events()
                .list(calendar_id)
                .time_min(start)
                .time_max(end)
                .single_events(true)
                .order_by("startTime")
                .max_results(PAGE_SIZE);
            if let Some(ref token) = page_token {
                call = call.page_token(token);
            }

            let (_, page) = call
                .doit()
                .await
                .with_context(|| format!("Failed to list events for calendar {}", calendar_id))?;

            for item in page.items.unwrap_or_default() {
                let id = item.id.clone();
                match to_raw(item, self.clock.as_ref()) {
                    Some(raw) => events.push(raw),
                    None => tracing::debug!("Skipping event {:?} without start/end", id),
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(events)
    }
}
