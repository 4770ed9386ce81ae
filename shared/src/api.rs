use serde::{Deserialize, Serialize};

use crate::models::{Event, ReducedEvent, WeekData};

// ============================================================================
// Remote endpoint wire types
// ============================================================================

/// Body of a push to the sync URL: a whole week, or one chunk of a cached one
#[derive(Debug, Serialize)]
pub struct SyncPayload<'a, E = Event> {
    pub week: &'a str,
    pub events: &'a [E],
    pub api_key: &'a str,
}

impl<'a> SyncPayload<'a> {
    pub fn new(data: &'a WeekData, api_key: &'a str) -> Self {
        Self {
            week: &data.week,
            events: &data.events,
            api_key,
        }
    }
}

impl<'a> SyncPayload<'a, ReducedEvent> {
    pub fn chunk(week: &'a str, events: &'a [ReducedEvent], api_key: &'a str) -> Self {
        Self {
            week,
            events,
            api_key,
        }
    }
}

/// Body of the classify trigger
#[derive(Debug, Serialize)]
pub struct ClassifyPayload<'a> {
    pub week: &'a str,
    pub api_key: &'a str,
}

/// Outcome of a push: the raw response, or why no response was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PushResult {
    Response { code: u16, body: String },
    Error { error: String },
}

impl PushResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

// ============================================================================
// Sync API Types
// ============================================================================

/// Which weeks a manual sync run covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncScope {
    Current,
    Last,
    #[default]
    All,
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRunQuery {
    pub scope: Option<SyncScope>,
}

/// Summary of one week's sync attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub week: String,
    pub event_count: usize,
    pub push: PushResult,
    pub classify_requested: bool,
}

/// Summary of pushing a cached week document in chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    pub week: String,
    pub event_count: usize,
    /// One result per chunk, in send order
    pub chunks: Vec<PushResult>,
    pub classify_requested: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncRunResponse {
    pub reports: Vec<SyncReport>,
}

// ============================================================================
// Query API Types
// ============================================================================

/// Query string of the on-demand week endpoint.
///
/// Kept as a string so malformed offsets degrade to 0 instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub week_offset: Option<String>,
}

impl WeekQuery {
    pub fn offset(&self) -> i64 {
        self.week_offset.as_deref().map(parse_week_offset).unwrap_or(0)
    }
}

/// Parse the leading integer of `raw` (`"-2"`, `" 3weeks"`), or 0 if there is none.
///
/// Values past the `i64` range saturate.
pub fn parse_week_offset(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .fold(0i64, |acc, digit| {
            let acc = acc.saturating_mul(10);
            if negative {
                acc.saturating_sub(digit)
            } else {
                acc.saturating_add(digit)
            }
        })
}

#[derive(Debug, Deserialize)]
pub struct ChunkQuery {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub count: usize,
}

// ============================================================================
// Health / Error Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_week_offset() {
        assert_eq!(parse_week_offset("0"), 0);
        assert_eq!(parse_week_offset("-1"), -1);
        assert_eq!(parse_week_offset("+2"), 2);
        assert_eq!(parse_week_offset(" 3weeks"), 3);
        assert_eq!(parse_week_offset("abc"), 0);
        assert_eq!(parse_week_offset(""), 0);
        assert_eq!(parse_week_offset("-"), 0);
    }

    #[test]
    fn test_week_offset_saturates() {
        assert_eq!(parse_week_offset("99999999999999999999999"), i64::MAX);
        assert_eq!(parse_week_offset("-99999999999999999999999"), i64::MIN);
        assert_eq!(parse_week_offset("-9223372036854775808"), i64::MIN);
        assert_eq!(parse_week_offset("9223372036854775807x"), i64::MAX);
    }

    #[test]
    fn test_missing_offset_defaults_to_zero() {
        assert_eq!(WeekQuery::default().offset(), 0);
    }

    #[test]
    fn test_push_result_wire_shape() {
        let ok = serde_json::to_value(PushResult::Response {
            code: 200,
            body: "ok".into(),
        })
        .unwrap();
        assert_eq!(ok, serde_json::json!({"code": 200, "body": "ok"}));

        let err = serde_json::to_value(PushResult::error("No SYNC_URL configured")).unwrap();
        assert_eq!(err, serde_json::json!({"error": "No SYNC_URL configured"}));
    }

    #[test]
    fn test_sync_payload_wire_shape() {
        let data = WeekData {
            week: "2025-W02".into(),
            events: vec![],
        };
        let value = serde_json::to_value(SyncPayload::new(&data, "secret")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"week": "2025-W02", "events": [], "api_key": "secret"})
        );
    }
}
