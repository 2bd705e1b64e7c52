//! Reconcile a small gateway batch against an in-memory store

use transmission_reconciler::utils::MemoryRecordStore;
use transmission_reconciler::{BatchCoordinator, FileRecord, Notification, ReconciliationEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📡 Transmission Reconciler - Batch Example\n");

    let storage = MemoryRecordStore::with_records(vec![
        FileRecord::new(10001202403120001, "TUTGMF0001000120240312-0001", "PENDING"),
        FileRecord::new(10001202403120002, "TUTGMF0001000120240312-0002-A", "SENT"),
    ]);
    let coordinator = BatchCoordinator::new(ReconciliationEngine::new(storage.clone()));

    let batch = vec![
        Notification::new(
            "TUTGMF0001000120240312-0001.txt",
            "SUCCESSFUL",
            "0000",
            "Transmission accepted",
        ),
        Notification::new(
            "TUTGMF0001000120240312-0002-A.txt",
            "ERROR",
            "0001",
            "Cancellation rejected",
        ),
        Notification::new(
            "TUTGMF0001000120240312-0099.txt",
            "SUCCESSFUL",
            "0000",
            "Unknown file",
        ),
    ];

    let summary = coordinator.process_batch(&batch).await;

    println!("📊 Batch {}", summary.batch_id);
    println!("  Total files: {}", summary.total_items);
    println!("  Errors:      {}", summary.error_count);
    println!("  Message:     {}\n", summary.message);

    for name in ["TUTGMF0001000120240312-0001", "TUTGMF0001000120240312-0002-A"] {
        if let Some(record) = storage.record(name) {
            println!("  ✓ {} -> {}", record.name, record.status);
        }
    }

    println!("\n📝 Audit trail:");
    for entry in storage.audit_entries() {
        println!(
            "  {} {} -> {} at {}",
            entry.file_record_id, entry.status_before, entry.status_after, entry.changed_at
        );
    }

    Ok(())
}
