//! Event sink that records everything it receives

use std::sync::Mutex;

use crate::traits::{ReconciliationEvent, ReconciliationSink};

/// Collects reconciliation events in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ReconciliationEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far
    pub fn events(&self) -> Vec<ReconciliationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ReconciliationSink for MemorySink {
    fn emit(&self, event: ReconciliationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
