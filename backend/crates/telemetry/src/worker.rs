//! Background Log Writer
//!
//! Records flow through a bounded channel into a single writer task, so
//! request handlers never wait on the database. When the queue is full
//! the record is dropped with a warning; when a write fails the error is
//! logged and the worker keeps draining.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::record::LogRecord;
use crate::domain::repository::LogRepository;

/// Default queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Handle for enqueueing log records
#[derive(Clone)]
pub struct LogWriter {
    tx: mpsc::Sender<LogRecord>,
}

impl LogWriter {
    /// Spawn the writer task and return the enqueue handle.
    ///
    /// The task exits once every handle has been dropped and the queue
    /// has drained.
    pub fn spawn<R>(repo: Arc<R>, capacity: usize) -> (Self, JoinHandle<()>)
    where
        R: LogRepository + Send + Sync + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<LogRecord>(capacity);

        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                if let Err(e) = repo.append(&record).await {
                    tracing::error!(error = %e, path = %record.path, "Log write failed");
                }
            }
        });

        (Self { tx }, handle)
    }

    /// Queue a record without blocking; drops on overflow
    pub fn enqueue(&self, record: LogRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(path = %record.path, "Log queue full, record dropped");
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::warn!(path = %record.path, "Log writer stopped, record dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryLogStore, sample_record};

    #[tokio::test]
    async fn test_records_reach_secondary_partition() {
        let store = Arc::new(MemoryLogStore::new());
        let (writer, handle) = LogWriter::spawn(store.clone(), 8);

        writer.enqueue(sample_record("GET", "/api/logs", 200, 5));
        writer.enqueue(sample_record("POST", "/api/login", 401, 9));

        drop(writer);
        handle.await.unwrap();

        assert_eq!(store.secondary_len(), 2);
    }

    #[tokio::test]
    async fn test_overflow_drops_without_blocking() {
        // A repo that never completes keeps the queue full
        struct StuckRepo;
        impl LogRepository for StuckRepo {
            async fn append(&self, _: &LogRecord) -> crate::error::TelemetryResult<()> {
                std::future::pending().await
            }
            async fn fetch_primary(&self) -> crate::error::TelemetryResult<Vec<LogRecord>> {
                Ok(vec![])
            }
            async fn fetch_secondary(&self) -> crate::error::TelemetryResult<Vec<LogRecord>> {
                Ok(vec![])
            }
        }

        let (writer, handle) = LogWriter::spawn(Arc::new(StuckRepo), 1);

        // First record may be in-flight, second fills the queue, the rest
        // must drop immediately instead of blocking this task.
        for _ in 0..10 {
            writer.enqueue(sample_record("GET", "/api/logs", 200, 1));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_enqueue_after_shutdown_is_harmless() {
        let store = Arc::new(MemoryLogStore::new());
        let (writer, handle) = LogWriter::spawn(store, 8);

        handle.abort();
        let _ = handle.await;

        writer.enqueue(sample_record("GET", "/api/logs", 200, 5));
    }
}
