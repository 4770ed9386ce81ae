use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{chunk, health, sync, week};
use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // On-demand pull
        .route("/week", get(week::get_week))

        // Chunk extraction
        .route("/chunk", post(chunk::extract_chunk))

        // Manual sync
        .route("/sync/run", post(sync::run_sync))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use polling_services::calendar::{CalendarBackend, EventCollector};
    use polling_services::clock::WallClock;
    use polling_services::config::SyncSettings;
    use polling_services::dispatcher::SyncDispatcher;
    use polling_services::roster::Roster;
    use polling_services::transport::{Transport, TransportError, TransportResponse};
    use polling_services::WeekSync;
    use serde_json::Value;
    use shared::{CalendarSource, RawEvent};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    struct OneCalendar;

    #[async_trait]
    impl CalendarBackend for OneCalendar {
        async fn events_between(
            &self,
            calendar_id: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<RawEvent>> {
            if calendar_id != "ada@example.com" {
                bail!("Calendar {} not found", calendar_id);
            }
            Ok(vec![RawEvent {
                title: Some("Planning".to_string()),
                start: Utc.with_ymd_and_hms(2025, 1, 7, 15, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2025, 1, 7, 16, 0, 0).unwrap(),
                ..Default::default()
            }])
        }
    }

    #[derive(Default)]
    struct CountingTransport {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn post_json(
            &self,
            url: &str,
            _body: &Value,
        ) -> Result<TransportResponse, TransportError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(TransportResponse {
                code: 200,
                body: "ok".to_string(),
            })
        }
    }

    fn app(transport: Arc<CountingTransport>) -> Router {
        let now = NaiveDate::from_ymd_opt(2025, 1, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let clock = Arc::new(WallClock::new(None).pinned_at(now));
        let roster = Roster::new(vec![
            CalendarSource::new("Ada", "ada@example.com"),
            CalendarSource::new("Gone", "gone@example.com"),
        ])
        .unwrap();
        let settings = SyncSettings {
            sync_url: Some("https://tracker.example.com/api/sync".to_string()),
            api_key: "secret".to_string(),
            classify_url: None,
        };

        let pipeline = WeekSync::new(
            roster,
            EventCollector::new(Arc::new(OneCalendar), clock.clone()),
            SyncDispatcher::new(transport, Arc::new(settings)),
            clock,
        );

        Router::new()
            .nest("/api", api_routes())
            .with_state(AppState::new(Arc::new(pipeline)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(Default::default()), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_week_defaults_to_current() {
        let transport = Arc::new(CountingTransport::default());
        let (status, body) = send(app(transport.clone()), get("/api/week")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week"], "2025-W02");
        assert_eq!(body["events"].as_array().unwrap().len(), 1);
        assert_eq!(body["events"][0]["agent"], "Ada");
        assert_eq!(body["events"][0]["allDay"], false);
        assert!(transport.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_week_offset_parsing() {
        let (_, body) = send(app(Default::default()), get("/api/week?week_offset=-1")).await;
        assert_eq!(body["week"], "2025-W01");

        let (status, body) = send(app(Default::default()), get("/api/week?week_offset=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week"], "2025-W02");
    }

    #[tokio::test]
    async fn test_chunk_clips_range() {
        let document = serde_json::json!({
            "week": "2025-W02",
            "events": (0..10).map(|i| serde_json::json!({
                "agent": "Ada",
                "title": format!("event-{i}"),
                "start": "2025-01-07T15:00:00.000Z",
                "end": "2025-01-07T16:00:00.000Z",
                "allDay": false,
                "status": "confirmed",
            })).collect::<Vec<_>>(),
        })
        .to_string();

        let (status, body) = send(
            app(Default::default()),
            post("/api/chunk?start=8&count=5", document),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let chunk = body.as_array().unwrap();
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk[0]["title"], "event-8");
        assert!(chunk[0].get("status").is_none());
        assert_eq!(chunk[0]["description"], "");
    }

    #[tokio::test]
    async fn test_chunk_rejects_bad_document() {
        let (status, body) = send(
            app(Default::default()),
            post("/api/chunk?start=0&count=1", "<html>"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid event document");
    }

    #[tokio::test]
    async fn test_chunk_rejects_negative_start() {
        let (status, _) = send(
            app(Default::default()),
            post("/api/chunk?start=-1&count=1", "[]"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_manual_sync_runs_both_weeks() {
        let transport = Arc::new(CountingTransport::default());
        let (status, body) = send(app(transport.clone()), post("/api/sync/run", Body::empty())).await;

        assert_eq!(status, StatusCode::OK);
        let reports = body["reports"].as_array().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["classify_requested"], true);
        assert_eq!(reports[1]["classify_requested"], false);
        assert_eq!(reports[0]["push"]["code"], 200);
        assert_eq!(transport.urls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_manual_sync_scope() {
        let transport = Arc::new(CountingTransport::default());
        let (_, body) = send(
            app(transport.clone()),
            post("/api/sync/run?scope=last", Body::empty()),
        )
        .await;

        assert_eq!(body["reports"][0]["week"], "2025-W01");
        assert_eq!(
            *transport.urls.lock().unwrap(),
            ["https://tracker.example.com/api/sync"]
        );
    }
}
