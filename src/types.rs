//! Core types and data structures for transmission reconciliation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of transaction a transmitted file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Standard movement file
    Movement,
    /// Withdrawal of a prior submission, marked by the `-A` suffix
    Cancellation,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Movement => write!(f, "movement"),
            TransactionKind::Cancellation => write!(f, "cancellation"),
        }
    }
}

/// Transmission outcome reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Successful,
    Error,
}

impl OutcomeStatus {
    /// Parse the gateway's wire value. Matching is exact.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "SUCCESSFUL" => Some(OutcomeStatus::Successful),
            "ERROR" => Some(OutcomeStatus::Error),
            _ => None,
        }
    }

    /// Wire representation of the outcome
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Successful => "SUCCESSFUL",
            OutcomeStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle statuses this crate assigns to a file record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    Sent,
    SendFailed,
    CancellationSent,
    CancellationFailed,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Sent => "SENT",
            LifecycleStatus::SendFailed => "SEND_FAILED",
            LifecycleStatus::CancellationSent => "CANCELLATION_SENT",
            LifecycleStatus::CancellationFailed => "CANCELLATION_FAILED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transmission outcome as delivered by the gateway
///
/// The outcome status is kept as received so that an unknown value fails
/// the one item instead of the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// File name as transmitted, extension included
    pub subject_id: String,
    /// Raw outcome status (`SUCCESSFUL` or `ERROR`)
    pub outcome_status: String,
    /// Gateway result code
    pub outcome_code: String,
    /// Gateway result detail
    pub outcome_detail: String,
}

impl Notification {
    /// Create a new notification
    pub fn new(
        subject_id: impl Into<String>,
        outcome_status: impl Into<String>,
        outcome_code: impl Into<String>,
        outcome_detail: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            outcome_status: outcome_status.into(),
            outcome_code: outcome_code.into(),
            outcome_detail: outcome_detail.into(),
        }
    }
}

/// Persisted file record, unique per subject identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Numeric identity of the record
    pub id: i64,
    /// Subject identifier (file name without extension)
    pub name: String,
    /// Current lifecycle status; upstream values such as `PENDING` pass through untouched
    pub status: String,
    /// Last transmission outcome status
    #[serde(default)]
    pub outcome_status: String,
    /// Last transmission outcome code
    #[serde(default)]
    pub outcome_code: String,
    /// Last transmission outcome detail
    #[serde(default)]
    pub outcome_detail: String,
}

impl FileRecord {
    /// Create a record with no transmission outcome yet
    pub fn new(id: i64, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: status.into(),
            outcome_status: String::new(),
            outcome_code: String::new(),
            outcome_detail: String::new(),
        }
    }

    /// Overwrite the transmission outcome and lifecycle status in place
    pub fn apply_outcome(
        &mut self,
        outcome: OutcomeStatus,
        code: &str,
        detail: &str,
        status: LifecycleStatus,
    ) {
        self.outcome_status = outcome.as_str().to_string();
        self.outcome_code = code.to_string();
        self.outcome_detail = detail.to_string();
        self.status = status.as_str().to_string();
    }
}

/// Append-only record of one status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub file_record_id: i64,
    pub status_before: String,
    pub status_after: String,
    pub changed_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create an entry stamped with the current time
    pub fn new(file_record_id: i64, status_before: String, status_after: String) -> Self {
        Self {
            file_record_id,
            status_before,
            status_after,
            changed_at: Utc::now(),
        }
    }
}

/// Result of a successfully applied notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applied {
    pub record_id: i64,
    pub status_before: String,
    pub status_after: LifecycleStatus,
}

/// Aggregate outcome of one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Correlation id for every event of this batch
    pub batch_id: Uuid,
    /// Number of notifications received
    pub total_items: usize,
    /// Items that failed to reconcile
    pub error_count: usize,
    /// Items whose record was updated but whose audit row could not be written
    pub audit_write_failures: usize,
    /// True iff `error_count == 0`
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Message reported when every item in a batch reconciles
pub const ALL_PROCESSED_MESSAGE: &str = "All files were processed successfully";

impl BatchSummary {
    /// Build a summary from the batch counters
    pub fn new(
        batch_id: Uuid,
        total_items: usize,
        error_count: usize,
        audit_write_failures: usize,
    ) -> Self {
        debug_assert!(error_count <= total_items);
        let message = if error_count == 0 {
            ALL_PROCESSED_MESSAGE.to_string()
        } else {
            format!("{} of {} files failed to process", error_count, total_items)
        };

        Self {
            batch_id,
            total_items,
            error_count,
            audit_write_failures,
            success: error_count == 0,
            message,
        }
    }

    /// Items that reconciled, audit failures included
    pub fn processed_count(&self) -> usize {
        self.total_items.saturating_sub(self.error_count)
    }
}

/// Errors raised by a record store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Per-item reconciliation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconciliationError {
    #[error("File record not found for '{name}': {reason}")]
    NotFound { name: String, reason: String },
    #[error("Failed to update file record '{name}': {source}")]
    UpdateFailed { name: String, source: StoreError },
    #[error("Failed to append audit entry for record {record_id}: {source}")]
    AuditWriteFailed { record_id: i64, source: StoreError },
    #[error("Invalid transmission outcome '{value}' for '{name}'")]
    InvalidOutcome { name: String, value: String },
}

impl ReconciliationError {
    /// Whether the item counts toward the batch error count.
    ///
    /// An audit write failure comes after the record update committed, so the
    /// item is still counted as processed.
    pub fn counts_as_failure(&self) -> bool {
        !matches!(self, ReconciliationError::AuditWriteFailed { .. })
    }
}

/// Result type for reconciliation operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
