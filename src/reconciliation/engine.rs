//! Per-notification reconciliation against the record store

use std::sync::Arc;

use crate::observability::TracingSink;
use crate::reconciliation::{classify, resolve_status, strip_extension};
use crate::traits::*;
use crate::types::*;

/// Reconciles one notification at a time against a record store
pub struct ReconciliationEngine<S: RecordStore> {
    store: S,
    sink: Arc<dyn ReconciliationSink>,
}

impl<S: RecordStore> ReconciliationEngine<S> {
    /// Create an engine that logs through `tracing`
    pub fn new(store: S) -> Self {
        Self::with_sink(store, Arc::new(TracingSink))
    }

    /// Create an engine with a custom event sink
    pub fn with_sink(store: S, sink: Arc<dyn ReconciliationSink>) -> Self {
        Self { store, sink }
    }

    pub(crate) fn sink(&self) -> &dyn ReconciliationSink {
        self.sink.as_ref()
    }

    /// Apply one gateway notification to its file record.
    ///
    /// The record update and the audit append are separate store calls. If the
    /// append fails the update stays committed and `AuditWriteFailed` is
    /// returned.
    pub async fn process_one(&self, notification: &Notification) -> ReconciliationResult<Applied> {
        let file_name = notification.subject_id.as_str();
        let key = strip_extension(file_name);
        let kind = classify(key);
        self.sink.emit(ReconciliationEvent::Classified {
            file_name: file_name.to_string(),
            kind,
        });

        let outcome = OutcomeStatus::from_wire(&notification.outcome_status).ok_or_else(|| {
            ReconciliationError::InvalidOutcome {
                name: file_name.to_string(),
                value: notification.outcome_status.clone(),
            }
        })?;

        let mut record = match self.store.get_by_name(key).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Err(ReconciliationError::NotFound {
                    name: key.to_string(),
                    reason: "no file record with this name".to_string(),
                })
            }
            Err(err) => {
                return Err(ReconciliationError::NotFound {
                    name: key.to_string(),
                    reason: err.to_string(),
                })
            }
        };

        // Read before apply_outcome overwrites it
        let status_before = record.status.clone();
        let status_after = resolve_status(kind, outcome);
        record.apply_outcome(
            outcome,
            &notification.outcome_code,
            &notification.outcome_detail,
            status_after,
        );
        self.sink.emit(ReconciliationEvent::StatusResolved {
            file_name: file_name.to_string(),
            record_id: record.id,
            status_before: status_before.clone(),
            status_after,
        });

        self.store
            .update(&record)
            .await
            .map_err(|source| ReconciliationError::UpdateFailed {
                name: key.to_string(),
                source,
            })?;

        let entry = AuditEntry::new(
            record.id,
            status_before.clone(),
            status_after.as_str().to_string(),
        );
        self.store
            .append_audit(&entry)
            .await
            .map_err(|source| ReconciliationError::AuditWriteFailed {
                record_id: record.id,
                source,
            })?;
        self.sink.emit(ReconciliationEvent::AuditAppended {
            file_name: file_name.to_string(),
            record_id: record.id,
        });

        Ok(Applied {
            record_id: record.id,
            status_before,
            status_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{MemoryRecordStore, MemorySink};

    fn engine_with(
        records: Vec<FileRecord>,
    ) -> (ReconciliationEngine<MemoryRecordStore>, MemoryRecordStore) {
        let storage = MemoryRecordStore::with_records(records);
        let engine = ReconciliationEngine::new(storage.clone());
        (engine, storage)
    }

    #[tokio::test]
    async fn test_successful_movement() {
        let (engine, storage) = engine_with(vec![FileRecord::new(10001, "F0001", "PENDING")]);

        let applied = engine
            .process_one(&Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK"))
            .await
            .unwrap();

        assert_eq!(applied.record_id, 10001);
        assert_eq!(applied.status_before, "PENDING");
        assert_eq!(applied.status_after, LifecycleStatus::Sent);

        let record = storage.record("F0001").unwrap();
        assert_eq!(record.status, "SENT");
        assert_eq!(record.outcome_status, "SUCCESSFUL");
        assert_eq!(record.outcome_code, "0000");
        assert_eq!(record.outcome_detail, "OK");

        let audit = storage.audit_entries();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].file_record_id, 10001);
        assert_eq!(audit[0].status_before, "PENDING");
        assert_eq!(audit[0].status_after, "SENT");
    }

    #[tokio::test]
    async fn test_failed_cancellation() {
        let (engine, storage) = engine_with(vec![FileRecord::new(2, "F0002-A", "PENDING")]);

        engine
            .process_one(&Notification::new("F0002-A.txt", "ERROR", "0001", "Rejected"))
            .await
            .unwrap();

        assert_eq!(storage.record("F0002-A").unwrap().status, "CANCELLATION_FAILED");
    }

    #[tokio::test]
    async fn test_missing_record_does_not_touch_store() {
        let (engine, storage) = engine_with(vec![]);

        let err = engine
            .process_one(&Notification::new("F9999.txt", "SUCCESSFUL", "0000", "OK"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconciliationError::NotFound { ref name, .. } if name == "F9999"));
        assert_eq!(storage.update_calls(), 0);
        assert!(storage.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_error_is_reported_as_not_found() {
        let (engine, storage) = engine_with(vec![FileRecord::new(1, "F0001", "PENDING")]);
        storage.fail_lookups_for("F0001");

        let err = engine
            .process_one(&Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconciliationError::NotFound { .. }));
        assert_eq!(storage.update_calls(), 0);
        assert_eq!(storage.record("F0001").unwrap().status, "PENDING");
    }

    #[tokio::test]
    async fn test_update_failure_keeps_stored_record() {
        let (engine, storage) = engine_with(vec![FileRecord::new(1, "F0001", "PENDING")]);
        storage.fail_updates_for("F0001");

        let err = engine
            .process_one(&Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconciliationError::UpdateFailed { .. }));
        assert!(err.counts_as_failure());
        let record = storage.record("F0001").unwrap();
        assert_eq!(record.status, "PENDING");
        assert_eq!(record.outcome_status, "");
        assert!(storage.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn test_audit_failure_keeps_update() {
        let (engine, storage) = engine_with(vec![FileRecord::new(1, "F0001", "PENDING")]);
        storage.fail_audits_for(1);

        let err = engine
            .process_one(&Notification::new("F0001.txt", "ERROR", "0001", "Rejected"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReconciliationError::AuditWriteFailed { record_id: 1, .. }));
        assert!(!err.counts_as_failure());
        assert_eq!(storage.record("F0001").unwrap().status, "SEND_FAILED");
        assert!(storage.audit_entries().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_outcome_is_rejected_before_lookup() {
        let (engine, storage) = engine_with(vec![FileRecord::new(1, "F0001", "PENDING")]);

        let err = engine
            .process_one(&Notification::new("F0001.txt", "PARTIAL", "0002", "?"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ReconciliationError::InvalidOutcome {
                name: "F0001.txt".to_string(),
                value: "PARTIAL".to_string(),
            }
        );
        assert_eq!(storage.lookup_calls(), 0);
        assert_eq!(storage.record("F0001").unwrap().status, "PENDING");
    }

    #[tokio::test]
    async fn test_events_are_emitted_to_injected_sink() {
        let storage = MemoryRecordStore::with_records(vec![FileRecord::new(3, "F0003-A", "SENT")]);
        let sink = Arc::new(MemorySink::new());
        let engine = ReconciliationEngine::with_sink(storage, sink.clone());

        engine
            .process_one(&Notification::new("F0003-A.dat", "SUCCESSFUL", "0000", "OK"))
            .await
            .unwrap();

        assert_eq!(
            sink.events(),
            vec![
                ReconciliationEvent::Classified {
                    file_name: "F0003-A.dat".to_string(),
                    kind: TransactionKind::Cancellation,
                },
                ReconciliationEvent::StatusResolved {
                    file_name: "F0003-A.dat".to_string(),
                    record_id: 3,
                    status_before: "SENT".to_string(),
                    status_after: LifecycleStatus::CancellationSent,
                },
                ReconciliationEvent::AuditAppended {
                    file_name: "F0003-A.dat".to_string(),
                    record_id: 3,
                },
            ]
        );
    }
}
