//! Append-only diagnostic log
//!
//! Keeps the most recent entries in memory so a host shell can show them, and
//! mirrors every entry to the `log` facade.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Default number of entries kept in memory
pub const MAX_LOG_ENTRIES: usize = 200;

#[derive(Debug)]
pub struct EventLog {
    entries: RefCell<VecDeque<String>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(MAX_LOG_ENTRIES)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RefCell::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry; the oldest entry is dropped once full
    pub fn append(&self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);

        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message);
    }

    /// Snapshot of the kept entries, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.borrow().iter().any(|e| e.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
