//! Batch coordination and summary shaping

use tracing::Instrument;
use uuid::Uuid;

use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Drives a batch of notifications through the reconciliation engine
pub struct BatchCoordinator<S: RecordStore> {
    engine: ReconciliationEngine<S>,
}

impl<S: RecordStore> BatchCoordinator<S> {
    /// Create a coordinator over an engine
    pub fn new(engine: ReconciliationEngine<S>) -> Self {
        Self { engine }
    }

    /// Process every notification in order and summarize the outcome.
    ///
    /// Items are awaited one after another; a failing item is counted and
    /// the batch moves on.
    pub async fn process_batch(&self, notifications: &[Notification]) -> BatchSummary {
        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", %batch_id);

        async move {
            let sink = self.engine.sink();
            sink.emit(ReconciliationEvent::BatchStarted {
                batch_id,
                total_items: notifications.len(),
            });

            let mut error_count = 0;
            let mut audit_write_failures = 0;

            for notification in notifications {
                let file_name = notification.subject_id.clone();
                match self.engine.process_one(notification).await {
                    Ok(_) => sink.emit(ReconciliationEvent::ItemProcessed { file_name }),
                    Err(error) => {
                        if error.counts_as_failure() {
                            error_count += 1;
                        } else {
                            audit_write_failures += 1;
                        }
                        sink.emit(ReconciliationEvent::ItemFailed { file_name, error });
                    }
                }
            }

            let summary = BatchSummary::new(
                batch_id,
                notifications.len(),
                error_count,
                audit_write_failures,
            );
            sink.emit(ReconciliationEvent::BatchCompleted {
                summary: summary.clone(),
            });
            summary
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{MemoryRecordStore, MemorySink};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_batch() {
        let coordinator = BatchCoordinator::new(ReconciliationEngine::new(MemoryRecordStore::new()));

        let summary = coordinator.process_batch(&[]).await;

        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.error_count, 0);
        assert!(summary.success);
        assert_eq!(summary.message, ALL_PROCESSED_MESSAGE);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let storage = MemoryRecordStore::with_records(vec![
            FileRecord::new(1, "F0001", "PENDING"),
            FileRecord::new(3, "F0003", "PENDING"),
        ]);
        let coordinator = BatchCoordinator::new(ReconciliationEngine::new(storage.clone()));

        let summary = coordinator
            .process_batch(&[
                Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK"),
                Notification::new("F0002.txt", "SUCCESSFUL", "0000", "OK"),
                Notification::new("F0003.txt", "UNKNOWN", "0000", "OK"),
                Notification::new("F0003.txt", "ERROR", "0001", "Rejected"),
            ])
            .await;

        assert_eq!(summary.total_items, 4);
        assert_eq!(summary.error_count, 2);
        assert!(!summary.success);
        assert_eq!(summary.message, "2 of 4 files failed to process");
        assert_eq!(storage.record("F0001").unwrap().status, "SENT");
        assert_eq!(storage.record("F0003").unwrap().status, "SEND_FAILED");
        assert_eq!(storage.audit_entries().len(), 2);
    }

    #[tokio::test]
    async fn test_audit_failure_counts_as_processed() {
        let storage = MemoryRecordStore::with_records(vec![FileRecord::new(1, "F0001", "PENDING")]);
        storage.fail_audits_for(1);
        let coordinator = BatchCoordinator::new(ReconciliationEngine::new(storage.clone()));

        let summary = coordinator
            .process_batch(&[Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK")])
            .await;

        assert!(summary.success);
        assert_eq!(summary.error_count, 0);
        assert_eq!(summary.audit_write_failures, 1);
        assert_eq!(storage.record("F0001").unwrap().status, "SENT");
    }

    #[tokio::test]
    async fn test_batch_events_bracket_items() {
        let storage = MemoryRecordStore::with_records(vec![FileRecord::new(1, "F0001", "PENDING")]);
        let sink = Arc::new(MemorySink::new());
        let coordinator =
            BatchCoordinator::new(ReconciliationEngine::with_sink(storage, sink.clone()));

        let summary = coordinator
            .process_batch(&[
                Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK"),
                Notification::new("F0404.txt", "SUCCESSFUL", "0000", "OK"),
            ])
            .await;

        let events = sink.events();
        assert_eq!(
            events.first(),
            Some(&ReconciliationEvent::BatchStarted {
                batch_id: summary.batch_id,
                total_items: 2,
            })
        );
        assert_eq!(
            events.last(),
            Some(&ReconciliationEvent::BatchCompleted {
                summary: summary.clone()
            })
        );
        assert!(events.contains(&ReconciliationEvent::ItemProcessed {
            file_name: "F0001.txt".to_string()
        }));
        assert!(events.iter().any(|event| matches!(
            event,
            ReconciliationEvent::ItemFailed { file_name, error: ReconciliationError::NotFound { .. } }
                if file_name == "F0404.txt"
        )));
    }
}
