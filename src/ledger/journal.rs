//! Append-only event journal kept by each instance

use uuid::Uuid;

use crate::types::*;

/// Ordered record of the events an instance has emitted
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    entries: Vec<LogEntry>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the events of one successful call and build its receipt
    pub fn record(&mut self, tx_id: Uuid, events: Vec<Event>) -> Receipt {
        let now = chrono::Utc::now().naive_utc();
        self.entries.extend(events.iter().cloned().map(|event| LogEntry {
            tx_id,
            event,
            recorded_at: now,
        }));
        Receipt::new(tx_id, events)
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.entries.iter().map(|e| e.event.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
