//! Telemetry Router

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::domain::repository::LogRepository;
use crate::infra::postgres::PgLogRepository;
use crate::presentation::handlers::{self, TelemetryAppState};

/// Create the telemetry router with the PostgreSQL repository
pub fn telemetry_router(repo: PgLogRepository) -> Router {
    telemetry_router_generic(repo)
}

/// Create a telemetry router for any repository implementation
pub fn telemetry_router_generic<R>(repo: R) -> Router
where
    R: LogRepository + Send + Sync + 'static,
{
    let state = TelemetryAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/logs", get(handlers::logs::<R>))
        .route("/logs/severity", get(handlers::severity::<R>))
        .route("/logs/methods", get(handlers::methods::<R>))
        .route("/logs/response-times", get(handlers::response_times::<R>))
        .route("/logs/servers", get(handlers::servers::<R>))
        .with_state(state)
}
