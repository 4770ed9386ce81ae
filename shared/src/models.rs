use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used when a backend record has no title
pub const UNTITLED: &str = "(No Title)";

/// Status reported when the backend exposes none
pub const DEFAULT_STATUS: &str = "confirmed";

/// Maximum description length kept on a normalized event, in characters
pub const DESCRIPTION_LIMIT: usize = 500;

/// One backing calendar in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    /// Display label copied onto every event of this calendar
    pub name: String,
    /// Opaque backend identifier (e.g. a Google calendar id)
    pub id: String,
}

impl CalendarSource {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Raw record as returned by a calendar backend, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEvent {
    pub title: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub all_day: Option<bool>,
    /// Response status of the calendar owner, when the backend knows it
    pub my_status: Option<String>,
}

/// Normalized calendar event in the compact sync schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub agent: String,
    pub title: String,
    #[serde(with = "crate::timestamp")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub end: DateTime<Utc>,
    pub description: String,
    pub location: String,
    pub all_day: bool,
    pub status: String,
}

impl Event {
    /// Build an event for `agent` from a raw backend record.
    ///
    /// Absent or empty titles become [`UNTITLED`], descriptions are cut to
    /// [`DESCRIPTION_LIMIT`] characters and the status falls back to
    /// [`DEFAULT_STATUS`].
    pub fn normalize(agent: &str, raw: RawEvent) -> Self {
        let title = raw
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let description = raw
            .description
            .map(|d| truncate_chars(&d, DESCRIPTION_LIMIT))
            .unwrap_or_default();

        Self {
            agent: agent.to_string(),
            title,
            start: raw.start,
            end: raw.end,
            description,
            location: raw.location.unwrap_or_default(),
            all_day: raw.all_day.unwrap_or(false),
            status: raw
                .my_status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        }
    }
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Reduced event produced by chunk extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedEvent {
    pub agent: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub location: String,
}

impl From<&Event> for ReducedEvent {
    fn from(event: &Event) -> Self {
        Self {
            agent: event.agent.clone(),
            title: event.title.clone(),
            start: crate::timestamp::format(&event.start),
            end: crate::timestamp::format(&event.end),
            description: event.description.clone(),
            location: event.location.clone(),
        }
    }
}

/// Event-like record read from an already rendered document.
///
/// Accepts the full key names as well as the one-letter keys used by
/// cached week files. Any other field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventRecord {
    #[serde(default, alias = "a")]
    pub agent: Option<String>,
    #[serde(default, alias = "t")]
    pub title: Option<String>,
    #[serde(default, alias = "s")]
    pub start: Option<String>,
    #[serde(default, alias = "n")]
    pub end: Option<String>,
    #[serde(default, alias = "d")]
    pub description: Option<String>,
    #[serde(default, alias = "l")]
    pub location: Option<String>,
}

impl From<&EventRecord> for ReducedEvent {
    fn from(record: &EventRecord) -> Self {
        Self {
            agent: record.agent.clone().unwrap_or_default(),
            title: record.title.clone().unwrap_or_default(),
            start: record.start.clone().unwrap_or_default(),
            end: record.end.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            location: record.location.clone().unwrap_or_default(),
        }
    }
}

/// A week's aggregated events, in roster order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    pub week: String,
    pub events: Vec<Event>,
}
