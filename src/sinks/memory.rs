//! In-memory capture sink

use crate::core::{LogRecord, Result, Severity, Sink};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Keeps every record it receives, in arrival order.
///
/// Useful in tests and for surfacing recent log lines in diagnostics views.
/// An optional capacity turns it into a ring that discards the oldest
/// records first.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<VecDeque<LogRecord>>,
    capacity: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Snapshot of the captured records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().iter().cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn severities(&self) -> Vec<Severity> {
        self.records.lock().iter().map(|r| r.severity).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut records = self.records.lock();
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Ok(());
            }
            if records.len() >= capacity {
                records.pop_front();
            }
        }
        records.push_back(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
