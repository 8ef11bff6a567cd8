//! Aggregation Handlers
//!
//! Each endpoint merges both partitions and computes its view in a
//! single pass; nothing is cached between calls.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::domain::aggregate;
use crate::domain::record::{PRIMARY_SERVER, SECONDARY_SERVER, TaggedRecord};
use crate::domain::repository::LogRepository;
use crate::error::TelemetryResult;

/// Shared state for aggregation handlers
pub struct TelemetryAppState<R>
where
    R: LogRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

// Manual impl: the derive would require R itself to be Clone
impl<R> Clone for TelemetryAppState<R>
where
    R: LogRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

async fn merged<R>(repo: &R) -> TelemetryResult<Vec<TaggedRecord>>
where
    R: LogRepository + Send + Sync,
{
    let primary = repo.fetch_primary().await?;
    let secondary = repo.fetch_secondary().await?;

    Ok(primary
        .into_iter()
        .map(|record| TaggedRecord {
            server: PRIMARY_SERVER.to_string(),
            record,
        })
        .chain(secondary.into_iter().map(|record| TaggedRecord {
            server: SECONDARY_SERVER.to_string(),
            record,
        }))
        .collect())
}

/// GET /api/logs — merged raw records, tagged by origin
pub async fn logs<R>(
    State(state): State<TelemetryAppState<R>>,
) -> TelemetryResult<Json<Vec<TaggedRecord>>>
where
    R: LogRepository + Send + Sync + 'static,
{
    Ok(Json(merged(state.repo.as_ref()).await?))
}

/// GET /api/logs/severity — count by severity per server
pub async fn severity<R>(
    State(state): State<TelemetryAppState<R>>,
) -> TelemetryResult<Json<BTreeMap<String, BTreeMap<String, u64>>>>
where
    R: LogRepository + Send + Sync + 'static,
{
    let records = merged(state.repo.as_ref()).await?;
    Ok(Json(aggregate::severity_by_server(&records)))
}

/// GET /api/logs/methods — count by HTTP method per server
pub async fn methods<R>(
    State(state): State<TelemetryAppState<R>>,
) -> TelemetryResult<Json<BTreeMap<String, BTreeMap<String, u64>>>>
where
    R: LogRepository + Send + Sync + 'static,
{
    let records = merged(state.repo.as_ref()).await?;
    Ok(Json(aggregate::methods_by_server(&records)))
}

/// GET /api/logs/response-times — mean response time per (server, path)
pub async fn response_times<R>(
    State(state): State<TelemetryAppState<R>>,
) -> TelemetryResult<Json<BTreeMap<String, BTreeMap<String, f64>>>>
where
    R: LogRepository + Send + Sync + 'static,
{
    let records = merged(state.repo.as_ref()).await?;
    Ok(Json(aggregate::mean_response_times(&records)))
}

/// GET /api/logs/servers — record count per server
pub async fn servers<R>(
    State(state): State<TelemetryAppState<R>>,
) -> TelemetryResult<Json<BTreeMap<String, u64>>>
where
    R: LogRepository + Send + Sync + 'static,
{
    let records = merged(state.repo.as_ref()).await?;
    Ok(Json(aggregate::counts_by_server(&records)))
}
