//! Request Capture Middleware
//!
//! Runs around every route: measures elapsed time, captures routing
//! metadata, classifies severity from the final status, and hands the
//! record to the background writer. The response is never delayed or
//! failed by telemetry.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::domain::record::{LogRecord, SystemInfo};
use crate::domain::severity::Severity;
use crate::worker::LogWriter;

/// State shared with the capture middleware
#[derive(Clone)]
pub struct TelemetryState {
    pub writer: LogWriter,
    pub environment: String,
}

impl TelemetryState {
    pub fn new(writer: LogWriter, environment: impl Into<String>) -> Self {
        Self {
            writer,
            environment: environment.into(),
        }
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`
pub async fn track_requests(
    State(state): State<TelemetryState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().clone();
    let protocol = format!("{:?}", request.version());
    let hostname = header_str(&request, header::HOST);
    let user_agent = header_str(&request, header::USER_AGENT);
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let record = LogRecord {
        log_level: Severity::from_status(status),
        timestamp: Utc::now(),
        method,
        url: uri.to_string(),
        path: uri.path().to_string(),
        query: parse_query(uri.query().unwrap_or("")),
        params: serde_json::json!({}),
        status,
        response_time_ms: started.elapsed().as_millis() as i64,
        ip,
        user_agent,
        protocol,
        hostname,
        system: SystemInfo {
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.environment.clone(),
            pid: std::process::id(),
        },
    };

    state.writer.enqueue(record);
    response
}

fn header_str(request: &Request, name: header::HeaderName) -> String {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Parse a raw query string into a flat JSON object; last key wins
fn parse_query(raw: &str) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(key.to_string(), serde_json::Value::from(value));
    }
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryLogStore;
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query(""), serde_json::json!({}));
        assert_eq!(
            parse_query("a=1&b=two&c"),
            serde_json::json!({ "a": "1", "b": "two", "c": "" })
        );
        assert_eq!(parse_query("a=1&a=2"), serde_json::json!({ "a": "2" }));
    }

    async fn wait_for_record(store: &MemoryLogStore) -> crate::domain::record::LogRecord {
        for _ in 0..100 {
            if let Some(record) = store.secondary.lock().unwrap().first().cloned() {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("record never reached the store");
    }

    #[tokio::test]
    async fn test_request_produces_record() {
        let store = Arc::new(MemoryLogStore::new());
        let (writer, _handle) = LogWriter::spawn(store.clone(), 16);
        let state = TelemetryState::new(writer, "test");

        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn_with_state(state, track_requests));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/ping?check=1")
                    .header("user-agent", "test-agent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let record = wait_for_record(&store).await;
        assert_eq!(record.method, "GET");
        assert_eq!(record.path, "/ping");
        assert_eq!(record.status, 200);
        assert_eq!(record.log_level, Severity::Info);
        assert_eq!(record.query, serde_json::json!({ "check": "1" }));
        assert_eq!(record.user_agent, "test-agent");
        assert!(record.response_time_ms >= 0);
    }

    #[tokio::test]
    async fn test_error_response_classified_warn() {
        let store = Arc::new(MemoryLogStore::new());
        let (writer, _handle) = LogWriter::spawn(store.clone(), 16);
        let state = TelemetryState::new(writer, "test");

        let app = Router::new()
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .layer(axum::middleware::from_fn_with_state(state, track_requests));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let record = wait_for_record(&store).await;
        assert_eq!(record.log_level, Severity::Warn);
    }
}
