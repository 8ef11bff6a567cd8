//! In-memory test doubles and fixtures.

use std::sync::Mutex;

use chrono::Utc;

use crate::domain::record::{LogRecord, SystemInfo, TaggedRecord};
use crate::domain::repository::LogRepository;
use crate::domain::severity::Severity;
use crate::error::TelemetryResult;

pub fn sample_record(method: &str, path: &str, status: u16, response_time_ms: i64) -> LogRecord {
    LogRecord {
        log_level: Severity::from_status(status),
        timestamp: Utc::now(),
        method: method.to_string(),
        url: path.to_string(),
        path: path.to_string(),
        query: serde_json::json!({}),
        params: serde_json::json!({}),
        status,
        response_time_ms,
        ip: "127.0.0.1".to_string(),
        user_agent: "test-agent".to_string(),
        protocol: "HTTP/1.1".to_string(),
        hostname: "localhost".to_string(),
        system: SystemInfo {
            service_version: "0.1.0".to_string(),
            environment: "test".to_string(),
            pid: 1234,
        },
    }
}

pub fn tag(server: &str, record: LogRecord) -> TaggedRecord {
    TaggedRecord {
        server: server.to_string(),
        record,
    }
}

/// Two in-memory partitions
#[derive(Default)]
pub struct MemoryLogStore {
    pub primary: Mutex<Vec<LogRecord>>,
    pub secondary: Mutex<Vec<LogRecord>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_primary(&self, records: Vec<LogRecord>) {
        self.primary.lock().unwrap().extend(records);
    }

    pub fn seed_secondary(&self, records: Vec<LogRecord>) {
        self.secondary.lock().unwrap().extend(records);
    }

    pub fn secondary_len(&self) -> usize {
        self.secondary.lock().unwrap().len()
    }
}

impl LogRepository for MemoryLogStore {
    async fn append(&self, record: &LogRecord) -> TelemetryResult<()> {
        self.secondary.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn fetch_primary(&self) -> TelemetryResult<Vec<LogRecord>> {
        Ok(self.primary.lock().unwrap().clone())
    }

    async fn fetch_secondary(&self) -> TelemetryResult<Vec<LogRecord>> {
        Ok(self.secondary.lock().unwrap().clone())
    }
}
