//! In-memory record store for testing and local runs

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory record store with failure injection
///
/// Clones share the same underlying data, so a test can keep a handle while
/// the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<HashMap<String, FileRecord>>>,
    audit: Arc<RwLock<Vec<AuditEntry>>>,
    failing_lookups: Arc<RwLock<HashSet<String>>>,
    failing_updates: Arc<RwLock<HashSet<String>>>,
    failing_audits: Arc<RwLock<HashSet<i64>>>,
    lookup_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_string())
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records, keyed by name
    pub fn with_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    /// Create a store from a JSON array of file records
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let records: Vec<FileRecord> = serde_json::from_str(json)
            .map_err(|e| StoreError::Backend(format!("invalid seed data: {}", e)))?;

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.name.as_str()) {
                return Err(StoreError::Backend(format!(
                    "duplicate file record name in seed data: {}",
                    record.name
                )));
            }
        }

        Ok(Self::with_records(records))
    }

    /// Load seed records from a JSON file
    pub fn from_seed_file(path: &Path) -> StoreResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Backend(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Insert or replace a record
    pub fn insert(&self, record: FileRecord) -> StoreResult<()> {
        self.records
            .write()
            .map_err(poisoned)?
            .insert(record.name.clone(), record);
        Ok(())
    }

    /// Snapshot of a stored record
    pub fn record(&self, name: &str) -> Option<FileRecord> {
        self.records.read().ok()?.get(name).cloned()
    }

    /// Snapshot of the audit trail in append order
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of `get_by_name` calls made so far
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Number of `update` calls made so far, failed ones included
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Make lookups of `name` fail with a backend error
    pub fn fail_lookups_for(&self, name: &str) {
        if let Ok(mut names) = self.failing_lookups.write() {
            names.insert(name.to_string());
        }
    }

    /// Make updates of the record named `name` fail
    pub fn fail_updates_for(&self, name: &str) {
        if let Ok(mut names) = self.failing_updates.write() {
            names.insert(name.to_string());
        }
    }

    /// Make audit appends for `record_id` fail
    pub fn fail_audits_for(&self, record_id: i64) {
        if let Ok(mut ids) = self.failing_audits.write() {
            ids.insert(record_id);
        }
    }

    /// Clear all data and injected failures
    pub fn clear(&self) -> StoreResult<()> {
        self.records.write().map_err(poisoned)?.clear();
        self.audit.write().map_err(poisoned)?.clear();
        self.failing_lookups.write().map_err(poisoned)?.clear();
        self.failing_updates.write().map_err(poisoned)?.clear();
        self.failing_audits.write().map_err(poisoned)?.clear();
        self.lookup_calls.store(0, Ordering::SeqCst);
        self.update_calls.store(0, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<FileRecord>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_lookups.read().map_err(poisoned)?.contains(name) {
            return Err(StoreError::Backend(format!("lookup failed for {}", name)));
        }

        Ok(self.records.read().map_err(poisoned)?.get(name).cloned())
    }

    async fn update(&self, record: &FileRecord) -> StoreResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if self
            .failing_updates
            .read()
            .map_err(poisoned)?
            .contains(&record.name)
        {
            return Err(StoreError::Backend(format!(
                "update rejected for {}",
                record.name
            )));
        }

        // Single write guard: the replacement is all-or-nothing
        let mut records = self.records.write().map_err(poisoned)?;
        match records.get_mut(&record.name) {
            Some(stored) if stored.id == record.id => {
                *stored = record.clone();
                Ok(())
            }
            _ => Err(StoreError::NotFound(record.name.clone())),
        }
    }

    async fn append_audit(&self, entry: &AuditEntry) -> StoreResult<()> {
        if self
            .failing_audits
            .read()
            .map_err(poisoned)?
            .contains(&entry.file_record_id)
        {
            return Err(StoreError::Backend(format!(
                "audit append rejected for record {}",
                entry.file_record_id
            )));
        }

        self.audit.write().map_err(poisoned)?.push(entry.clone());
        Ok(())
    }
}
