//! Sink Collector
//!
//! Append-only destination for consumed items, guarded by its own lock so it
//! can be read while a consumer is still appending.

use parking_lot::Mutex;
use std::fmt;

/// Thread-safe append-only collector
pub struct SinkCollector<T> {
    items: Mutex<Vec<T>>,
}

impl<T> SinkCollector<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Pre-size the collector for an expected number of items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn append(&self, item: T) {
        self.items.lock().push(item);
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Take the collected items once no other handle remains
    pub fn into_inner(self) -> Vec<T> {
        self.items.into_inner()
    }
}

impl<T: Clone> SinkCollector<T> {
    /// Copy of the items collected so far, in append order
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T> Default for SinkCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SinkCollector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkCollector")
            .field("len", &self.len())
            .finish()
    }
}
