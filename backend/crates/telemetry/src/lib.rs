//! Request Telemetry Module
//!
//! Captures one structured record per request/response cycle and exposes
//! aggregate views over two log partitions:
//! - `logs` (primary) is populated by an external peer system
//! - `logs_secondary` is written by this service
//!
//! Writes go through a bounded queue drained by a background task so the
//! client path is never delayed; aggregation endpoints merge both
//! partitions on every call, tagging records with their origin server.

pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod worker;

pub use domain::record::{LogRecord, SystemInfo, TaggedRecord};
pub use domain::severity::Severity;
pub use error::{TelemetryError, TelemetryResult};
pub use infra::postgres::PgLogRepository;
pub use presentation::middleware::{TelemetryState, track_requests};
pub use presentation::router::telemetry_router;
pub use worker::LogWriter;

#[cfg(test)]
pub(crate) mod testing;
