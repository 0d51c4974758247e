//! Insertion Order Module
//!
//! Tracks insertion order for oldest-first eviction.

use std::collections::VecDeque;

use parking_lot::Mutex;

// == Insertion Order ==
/// Queue of `(key, seq)` pairs in the order they were inserted.
///
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Overwrites and removals are not tracked here. A pair whose `seq` no longer
/// matches the live entry is stale and is skipped by the caller.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: Mutex<VecDeque<(String, u64)>>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: Mutex::new(VecDeque::new()),
        }
    }

    // == Push ==
    /// Records an insertion as the newest.
    pub fn push(&self, key: String, seq: u64) {
        self.order.lock().push_back((key, seq));
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest recorded insertion.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&self) -> Option<(String, u64)> {
        self.order.lock().pop_front()
    }

    // == Retain ==
    /// Drops every pair for which `keep` returns false.
    pub fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&str, u64) -> bool,
    {
        self.order.lock().retain(|(key, seq)| keep(key, *seq));
    }

    // == Clear ==
    /// Empties the queue and runs `clear_entries` before releasing it.
    ///
    /// Pushes racing with the clear land after it, so a key inserted
    /// during the clear keeps its pair.
    pub fn clear_with<F>(&self, clear_entries: F)
    where
        F: FnOnce(),
    {
        let mut order = self.order.lock();
        order.clear();
        clear_entries();
    }

    /// Returns the number of tracked pairs, stale ones included.
    pub fn len(&self) -> usize {
        self.order.lock().len()
    }

    /// Returns true if no pairs are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.lock().is_empty()
    }
}
