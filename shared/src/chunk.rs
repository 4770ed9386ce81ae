//! Slicing already rendered event lists into the reduced schema.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{EventRecord, ReducedEvent};

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("Invalid event document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A rendered week document, or a bare list of events
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RenderedDocument {
    Week {
        #[serde(default)]
        week: Option<String>,
        events: Vec<EventRecord>,
    },
    Bare(Vec<EventRecord>),
}

impl RenderedDocument {
    fn parse(document: &str) -> Result<Self, ChunkError> {
        Ok(serde_json::from_str(document)?)
    }

    fn into_parts(self) -> (Option<String>, Vec<EventRecord>) {
        match self {
            Self::Week { week, events } => (week, events),
            Self::Bare(events) => (None, events),
        }
    }
}

/// A cached week file read back in the reduced schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWeek {
    /// The document's own week key, if it carries one
    pub week: Option<String>,
    pub events: Vec<ReducedEvent>,
}

/// Return `source[start..start + count]` in the reduced schema.
///
/// The range is clipped to the source, so asking past the end yields fewer
/// records (possibly none) rather than an error.
pub fn extract_chunk<'a, T>(source: &'a [T], start: usize, count: usize) -> Vec<ReducedEvent>
where
    ReducedEvent: From<&'a T>,
{
    let begin = start.min(source.len());
    let end = start.saturating_add(count).min(source.len());

    source[begin..end].iter().map(ReducedEvent::from).collect()
}

/// Parse a rendered document and extract a chunk from its `events` array
pub fn extract_chunk_from_document(
    document: &str,
    start: usize,
    count: usize,
) -> Result<Vec<ReducedEvent>, ChunkError> {
    let (_, records) = RenderedDocument::parse(document)?.into_parts();
    Ok(extract_chunk(&records, start, count))
}

/// Parse a whole rendered or cached document
pub fn read_cached_week(document: &str) -> Result<CachedWeek, ChunkError> {
    let (week, records) = RenderedDocument::parse(document)?.into_parts();
    Ok(CachedWeek {
        week,
        events: records.iter().map(ReducedEvent::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(n: usize) -> String {
        let events: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "agent": format!("agent-{i}"),
                    "title": format!("event-{i}"),
                    "start": "2025-01-06T15:00:00.000Z",
                    "end": "2025-01-06T16:00:00.000Z",
                    "description": if i % 2 == 0 { json!("notes") } else { json!(null) },
                    "allDay": false,
                    "status": "confirmed",
                })
            })
            .collect();
        json!({ "week": "2025-W02", "events": events }).to_string()
    }

    #[test]
    fn test_extracts_requested_slice() {
        let chunk = extract_chunk_from_document(&document(10), 2, 3).unwrap();

        let titles: Vec<_> = chunk.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["event-2", "event-3", "event-4"]);
        assert_eq!(chunk[1].description, "");
        assert_eq!(chunk[1].location, "");
    }

    #[test]
    fn test_output_has_only_reduced_fields() {
        let chunk = extract_chunk_from_document(&document(10), 2, 3).unwrap();
        let value = serde_json::to_value(&chunk[0]).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        assert_eq!(
            keys,
            ["agent", "description", "end", "location", "start", "title"]
        );
    }

    #[test]
    fn test_range_is_clipped() {
        assert_eq!(extract_chunk_from_document(&document(10), 8, 5).unwrap().len(), 2);
        assert!(extract_chunk_from_document(&document(10), 10, 5).unwrap().is_empty());
        assert!(extract_chunk_from_document(&document(10), 50, 5).unwrap().is_empty());
        assert!(extract_chunk_from_document(&document(10), 3, 0).unwrap().is_empty());
        assert_eq!(
            extract_chunk_from_document(&document(10), 0, usize::MAX).unwrap().len(),
            10
        );
    }

    #[test]
    fn test_accepts_bare_array() {
        let doc = r#"[{"a":"Ada","t":"Call","s":"2025-01-06","n":"2025-01-07"}]"#;
        let chunk = extract_chunk_from_document(doc, 0, 10).unwrap();
        assert_eq!(chunk.len(), 1);
        assert_eq!(chunk[0].agent, "Ada");
    }

    #[test]
    fn test_reads_cached_week_with_short_keys() {
        let doc = r#"{"week":"2026-W03","events":[
            {"a":"Ada","t":"Call","s":"2026-01-12T15:00:00.000Z","n":"2026-01-12T16:00:00.000Z","d":"notes","l":"Room 1"},
            {"agent":"Grace","title":"Review"}
        ]}"#;
        let cached = read_cached_week(doc).unwrap();

        assert_eq!(cached.week.as_deref(), Some("2026-W03"));
        assert_eq!(cached.events.len(), 2);
        assert_eq!(cached.events[0].description, "notes");
        assert_eq!(cached.events[0].location, "Room 1");
        assert_eq!(cached.events[1].agent, "Grace");
        assert_eq!(cached.events[1].start, "");
    }

    #[test]
    fn test_bare_cached_week_has_no_key() {
        let cached = read_cached_week(r#"[{"t":"Call"}]"#).unwrap();
        assert_eq!(cached.week, None);
        assert_eq!(cached.events[0].title, "Call");
        assert!(read_cached_week("[]").unwrap().events.is_empty());
    }

    #[test]
    fn test_rejects_malformed_document() {
        assert!(extract_chunk_from_document("not json", 0, 1).is_err());
    }
}
