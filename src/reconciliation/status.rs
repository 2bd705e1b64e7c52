//! Lifecycle status resolution

use crate::types::{LifecycleStatus, OutcomeStatus, TransactionKind};

/// Map a transaction kind and gateway outcome to the record's new status
pub fn resolve_status(kind: TransactionKind, outcome: OutcomeStatus) -> LifecycleStatus {
    match (kind, outcome) {
        (TransactionKind::Movement, OutcomeStatus::Error) => LifecycleStatus::SendFailed,
        (TransactionKind::Movement, OutcomeStatus::Successful) => LifecycleStatus::Sent,
        (TransactionKind::Cancellation, OutcomeStatus::Error) => {
            LifecycleStatus::CancellationFailed
        }
        (TransactionKind::Cancellation, OutcomeStatus::Successful) => {
            LifecycleStatus::CancellationSent
        }
    }
}
