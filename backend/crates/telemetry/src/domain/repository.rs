//! Log Repository Trait

use crate::domain::record::LogRecord;
use crate::error::TelemetryResult;

/// Partitioned log storage
///
/// The primary partition is written by an external peer and only read
/// here; this service appends to the secondary partition.
#[trait_variant::make(LogRepository: Send)]
pub trait LocalLogRepository {
    async fn append(&self, record: &LogRecord) -> TelemetryResult<()>;

    async fn fetch_primary(&self) -> TelemetryResult<Vec<LogRecord>>;

    async fn fetch_secondary(&self) -> TelemetryResult<Vec<LogRecord>>;
}
