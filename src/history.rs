use crate::filter::SearchFilter;
use crate::storage::Storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A past search, one per distinct query text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the epoch
    pub id: i64,
    pub query: String,
    pub filter: SearchFilter,
    pub created_at: DateTime<Utc>,
    pub result_count: u64,
    pub execution_time_ms: f64,
}

impl HistoryEntry {
    pub fn new(query: String, filter: SearchFilter, result_count: u64, execution_time_ms: f64) -> Self {
        let created_at = Utc::now();
        Self {
            id: created_at.timestamp_millis(),
            query,
            filter,
            created_at,
            result_count,
            execution_time_ms,
        }
    }
}

/// Most-recent-first list of past queries, persisted on every mutation.
pub struct SearchHistoryStore {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    storage: Storage,
}

impl SearchHistoryStore {
    /// Load the persisted history once, at startup
    pub fn load(storage: Storage, capacity: usize) -> Result<Self> {
        let mut entries = storage.load_history()?;
        entries.truncate(capacity);
        Ok(Self {
            entries,
            capacity,
            storage,
        })
    }

    /// Record a query, replacing any earlier entry with the same text and
    /// moving it to the front.
    pub fn record(
        &mut self,
        query: &str,
        filter: &SearchFilter,
        result_count: u64,
        execution_time_ms: f64,
    ) -> Result<()> {
        self.entries.retain(|entry| entry.query != query);
        self.entries.insert(
            0,
            HistoryEntry::new(query.to_string(), filter.clone(), result_count, execution_time_ms),
        );
        self.entries.truncate(self.capacity);

        self.storage.save_history(&self.entries)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.storage.clear_history()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `limit` recent queries containing `prefix`, ignoring case
    pub fn matching(&self, prefix: &str, limit: usize) -> Vec<String> {
        let needle = prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|entry| entry.query.to_lowercase().contains(&needle))
            .take(limit)
            .map(|entry| entry.query.clone())
            .collect()
    }
}
