//! # Transmission Reconciler
//!
//! Reconciles file-transmission outcomes reported by an external gateway
//! against persisted file records.
//!
//! ## Features
//!
//! - **Classification**: movement vs. cancellation files from the `-A` name suffix
//! - **Status resolution**: deterministic lifecycle transitions per outcome
//! - **Per-item isolation**: one failing notification never aborts its batch
//! - **Audit trail**: one append-only entry per applied transition
//! - **Storage abstraction**: trait-based record store with an in-memory implementation
//! - **HTTP boundary**: axum router with a 200 / 207 / 400 status contract
//!
//! ## Quick Start
//!
//! ```rust
//! use transmission_reconciler::utils::MemoryRecordStore;
//! use transmission_reconciler::{BatchCoordinator, FileRecord, Notification, ReconciliationEngine};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let storage = MemoryRecordStore::with_records(vec![FileRecord::new(1, "F0001", "PENDING")]);
//! let coordinator = BatchCoordinator::new(ReconciliationEngine::new(storage.clone()));
//!
//! let summary = coordinator
//!     .process_batch(&[Notification::new("F0001.txt", "SUCCESSFUL", "0000", "OK")])
//!     .await;
//!
//! assert!(summary.success);
//! assert_eq!(storage.record("F0001").unwrap().status, "SENT");
//! # }
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
