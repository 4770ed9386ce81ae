//! Re-pushing cached week documents.

use shared::api::BackfillReport;
use shared::{parse_week_key, read_cached_week, ChunkError};
use thiserror::Error;

use crate::dispatcher::SyncDispatcher;

pub const DEFAULT_CHUNK_SIZE: usize = 25;

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error(transparent)]
    Document(#[from] ChunkError),

    #[error("Document has no week key; pass one explicitly")]
    MissingWeek,

    #[error("'{0}' is not a week key like 2026-W03")]
    InvalidWeek(String),
}

/// Push a cached week document in chunks, then trigger classify once.
///
/// `week_key` overrides the document's own `week` field. An empty document
/// sends nothing.
pub async fn push_cached_week(
    dispatcher: &SyncDispatcher,
    week_key: Option<&str>,
    document: &str,
    chunk_size: usize,
) -> Result<BackfillReport, BackfillError> {
    let cached = read_cached_week(document)?;
    let week = week_key
        .map(str::to_string)
        .or(cached.week)
        .ok_or(BackfillError::MissingWeek)?;
    if parse_week_key(&week).is_none() {
        return Err(BackfillError::InvalidWeek(week));
    }

    if cached.events.is_empty() {
        tracing::warn!("{}: no cached events, skipping", week);
        return Ok(BackfillReport {
            week,
            event_count: 0,
            chunks: Vec::new(),
            classify_requested: false,
        });
    }

    tracing::info!("{}: {} events from cache", week, cached.events.len());
    let chunks = dispatcher
        .push_in_chunks(&week, &cached.events, chunk_size)
        .await;

    let settings = dispatcher.settings();
    let classify_requested =
        settings.sync_url.is_some() && dispatcher.trigger_classify(&week, &settings).await;

    Ok(BackfillReport {
        week,
        event_count: cached.events.len(),
        chunks,
        classify_requested,
    })
}
