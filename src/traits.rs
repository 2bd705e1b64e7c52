//! Traits for storage abstraction and injected logging

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::*;

/// Storage abstraction for persisted file records
///
/// This trait allows the reconciliation engine to work with any backend
/// (PostgreSQL, in-memory, etc.). Implementations must make each call atomic:
/// a failed `update` leaves the stored record exactly as it was.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get a file record by its subject identifier
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<FileRecord>>;

    /// Persist the outcome fields and status of an existing record
    async fn update(&self, record: &FileRecord) -> StoreResult<()>;

    /// Append an audit entry
    async fn append_audit(&self, entry: &AuditEntry) -> StoreResult<()>;
}

/// Observable steps of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationEvent {
    BatchStarted {
        batch_id: Uuid,
        total_items: usize,
    },
    Classified {
        file_name: String,
        kind: TransactionKind,
    },
    StatusResolved {
        file_name: String,
        record_id: i64,
        status_before: String,
        status_after: LifecycleStatus,
    },
    AuditAppended {
        file_name: String,
        record_id: i64,
    },
    ItemProcessed {
        file_name: String,
    },
    ItemFailed {
        file_name: String,
        error: ReconciliationError,
    },
    BatchCompleted {
        summary: BatchSummary,
    },
}

/// Destination for reconciliation events
///
/// Passed explicitly to the engine so callers decide where log output goes.
pub trait ReconciliationSink: Send + Sync {
    /// Emit an event. Must not block on I/O.
    fn emit(&self, event: ReconciliationEvent);
}
