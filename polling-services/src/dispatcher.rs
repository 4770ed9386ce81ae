//! Delivery of a week's events to the remote endpoint.

use shared::api::{ClassifyPayload, PushResult, SyncPayload};
use shared::{ReducedEvent, WeekData};
use std::sync::Arc;

use crate::config::{SettingsSource, SyncSettings};
use crate::transport::{Transport, TransportError, TransportResponse};

pub const NO_SYNC_URL: &str = "No SYNC_URL configured";

/// Posts week data, then classify triggers, through a [`Transport`].
///
/// Settings are loaded from the [`SettingsSource`] on every call.
pub struct SyncDispatcher {
    transport: Arc<dyn Transport>,
    settings: Arc<dyn SettingsSource>,
}

impl SyncDispatcher {
    pub fn new(transport: Arc<dyn Transport>, settings: Arc<dyn SettingsSource>) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub fn settings(&self) -> SyncSettings {
        self.settings.load()
    }

    /// Push `data` to the sync URL and hand back the raw response.
    ///
    /// Without a sync URL nothing is sent. Transport failures are reported in
    /// the result rather than returned as errors.
    pub async fn push_week(&self, data: &WeekData) -> PushResult {
        let settings = self.settings.load();
        let Some(sync_url) = settings.sync_url.as_deref() else {
            tracing::warn!("{}", NO_SYNC_URL);
            return PushResult::error(NO_SYNC_URL);
        };

        let payload = SyncPayload::new(data, &settings.api_key);
        self.deliver(sync_url, &payload, &data.week).await
    }

    /// Push cached events to the sync URL, `chunk_size` events per request.
    ///
    /// Chunks are sent in order and a failed chunk does not stop the rest.
    /// Without a sync URL the single result is the configuration error.
    pub async fn push_in_chunks(
        &self,
        week_key: &str,
        events: &[ReducedEvent],
        chunk_size: usize,
    ) -> Vec<PushResult> {
        let settings = self.settings.load();
        let Some(sync_url) = settings.sync_url.as_deref() else {
            tracing::warn!("{}", NO_SYNC_URL);
            return vec![PushResult::error(NO_SYNC_URL)];
        };

        let chunks = events.chunks(chunk_size.max(1));
        let total = chunks.len();
        let mut results = Vec::with_capacity(total);
        for (index, chunk) in chunks.enumerate() {
            let label = format!("{} chunk {}/{}", week_key, index + 1, total);
            let payload = SyncPayload::chunk(week_key, chunk, &settings.api_key);
            results.push(self.deliver(sync_url, &payload, &label).await);
        }
        results
    }

    /// Ask the endpoint to classify `week_key`. The outcome is only logged.
    ///
    /// Returns whether a request was sent.
    pub async fn trigger_classify(&self, week_key: &str, settings: &SyncSettings) -> bool {
        let Some(url) = settings.classify_endpoint() else {
            tracing::warn!("No classify URL configured; skipping classify for {}", week_key);
            return false;
        };

        let payload = ClassifyPayload {
            week: week_key,
            api_key: &settings.api_key,
        };
        match self.post(&url, &payload).await {
            Ok(response) => tracing::info!(
                "Classify response for {} ({}): {}",
                week_key,
                response.code,
                response.body
            ),
            Err(e) => tracing::warn!("Classify trigger for {} failed: {}", week_key, e),
        }
        true
    }

    async fn deliver<T: serde::Serialize>(
        &self,
        url: &str,
        payload: &T,
        label: &str,
    ) -> PushResult {
        match self.post(url, payload).await {
            Ok(TransportResponse { code, body }) => {
                tracing::info!("Push response for {} ({}): {}", label, code, body);
                PushResult::Response { code, body }
            }
            Err(e) => {
                tracing::error!("Push of {} failed: {}", label, e);
                PushResult::error(e.to_string())
            }
        }
    }

    async fn post<T: serde::Serialize>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<TransportResponse, TransportError> {
        let body = serde_json::to_value(payload)?;
        self.transport.post_json(url, &body).await
    }
}
