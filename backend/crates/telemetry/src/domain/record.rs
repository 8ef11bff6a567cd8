//! Log Record Shapes
//!
//! One record per request/response cycle. Credential material (passwords,
//! request bodies) is deliberately absent from the schema; only routing
//! and timing metadata is captured.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::severity::Severity;

/// Process-level metadata attached to every record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub service_version: String,
    pub environment: String,
    pub pid: u32,
}

/// Structured request telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub log_level: Severity,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub path: String,
    /// Parsed query string, `{}` when absent
    pub query: serde_json::Value,
    /// Matched route parameters, `{}` when absent
    pub params: serde_json::Value,
    pub status: u16,
    pub response_time_ms: i64,
    pub ip: String,
    pub user_agent: String,
    pub protocol: String,
    pub hostname: String,
    pub system: SystemInfo,
}

/// A log record tagged with the partition it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRecord {
    pub server: String,
    #[serde(flatten)]
    pub record: LogRecord,
}

/// Synthetic label for the primary partition (externally populated)
pub const PRIMARY_SERVER: &str = "server-1";

/// Synthetic label for the secondary partition (written by this service)
pub const SECONDARY_SERVER: &str = "server-2";
