use crate::history::HistoryEntry;
use crate::metrics::SearchMetrics;
use anyhow::{Context, Result};
use sled::Db;
use std::path::Path;

const STATE_TREE: &str = "client_state";
const HISTORY_SLOT: &str = "search_history";
const METRICS_SLOT: &str = "search_metrics";

/// Durable client state: one slot for search history, one for metrics.
#[derive(Clone)]
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open or create a storage database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).context("Failed to open database")?;
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open().context("Failed to create in-memory database")?;
        Ok(Self { db })
    }

    // ========== History Slot ==========

    /// Persist the full history list. Stored as JSON so the filter snapshot
    /// keeps its pruned shape.
    pub fn save_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        let tree = self.db.open_tree(STATE_TREE)?;
        let serialized = serde_json::to_vec(entries)?;
        tree.insert(HISTORY_SLOT, serialized)?;
        tree.flush()?;
        Ok(())
    }

    /// Load the history list; a missing slot is an empty history
    pub fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        let tree = self.db.open_tree(STATE_TREE)?;
        if let Some(data) = tree.get(HISTORY_SLOT)? {
            let entries = serde_json::from_slice(&data).context("Corrupt search history slot")?;
            Ok(entries)
        } else {
            Ok(Vec::new())
        }
    }

    /// Erase the history slot
    pub fn clear_history(&self) -> Result<()> {
        let tree = self.db.open_tree(STATE_TREE)?;
        tree.remove(HISTORY_SLOT)?;
        tree.flush()?;
        Ok(())
    }

    pub fn has_history(&self) -> Result<bool> {
        let tree = self.db.open_tree(STATE_TREE)?;
        Ok(tree.contains_key(HISTORY_SLOT)?)
    }

    // ========== Metrics Slot ==========

    pub fn save_metrics(&self, metrics: &SearchMetrics) -> Result<()> {
        let tree = self.db.open_tree(STATE_TREE)?;
        let serialized = bincode::serialize(metrics)?;
        tree.insert(METRICS_SLOT, serialized)?;
        tree.flush()?;
        Ok(())
    }

    /// Load the metrics snapshot; a missing slot yields `None`
    pub fn load_metrics(&self) -> Result<Option<SearchMetrics>> {
        let tree = self.db.open_tree(STATE_TREE)?;
        if let Some(data) = tree.get(METRICS_SLOT)? {
            let metrics = bincode::deserialize(&data).context("Corrupt search metrics slot")?;
            Ok(Some(metrics))
        } else {
            Ok(None)
        }
    }
}
