//! Suggestion cache with insertion-order eviction.
//!
//! Reads do not refresh an entry's position: once full, the entry that was
//! inserted first is the one replaced, however often it is hit.

use std::collections::{HashMap, VecDeque};

pub struct SuggestionCache {
    entries: HashMap<String, Vec<String>>,
    order: VecDeque<String>,
    capacity: usize,
}

impl SuggestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Vec<String>> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: String, value: Vec<String>) {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
