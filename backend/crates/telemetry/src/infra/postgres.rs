//! Postgres Log Repository
//!
//! Records are stored as JSONB blobs, one row per record. The two
//! partitions are separate tables with identical shape; `logs` belongs
//! to the external peer and is only ever read here.

use sqlx::{PgPool, Row};

use crate::domain::record::LogRecord;
use crate::domain::repository::LogRepository;
use crate::error::TelemetryResult;

#[derive(Clone)]
pub struct PgLogRepository {
    pool: PgPool,
}

impl PgLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, table: &str) -> TelemetryResult<Vec<LogRecord>> {
        // Table name comes from the two constants below, never from input
        let rows = sqlx::query(&format!("SELECT record FROM {table} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let value: serde_json::Value = row.try_get("record")?;
                Ok(serde_json::from_value(value)?)
            })
            .collect()
    }
}

const PRIMARY_TABLE: &str = "logs";
const SECONDARY_TABLE: &str = "logs_secondary";

impl LogRepository for PgLogRepository {
    async fn append(&self, record: &LogRecord) -> TelemetryResult<()> {
        let value = serde_json::to_value(record)?;

        sqlx::query(&format!(
            "INSERT INTO {SECONDARY_TABLE} (record) VALUES ($1)"
        ))
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_primary(&self) -> TelemetryResult<Vec<LogRecord>> {
        self.fetch(PRIMARY_TABLE).await
    }

    async fn fetch_secondary(&self) -> TelemetryResult<Vec<LogRecord>> {
        self.fetch(SECONDARY_TABLE).await
    }
}
