//! Telemetry Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use thiserror::Error;

pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<TelemetryError> for AppError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::Database(source) => {
                AppError::internal("Database error").with_source(source)
            }
            TelemetryError::Serialization(source) => {
                AppError::internal("Record serialization failed").with_source(source)
            }
        }
    }
}

impl IntoResponse for TelemetryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
