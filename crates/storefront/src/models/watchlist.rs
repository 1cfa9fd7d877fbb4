//! Personal watchlist: entries and their persistence adapter.
//!
//! The watchlist reuses the cart crate's storage port and follows the same
//! durability rules: corrupt persisted data loads as an empty list, and a
//! failed save is logged without interrupting the user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use eztech_cart::{KeyValueStore, StoreError};

/// Well-known storage key prefix for watchlist blobs.
pub const WATCHLIST_STORAGE_KEY: &str = "watchlist.items";

/// One entry on a user's watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl WatchlistEntry {
    /// Create a new, not-yet-watched entry.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Persistence adapter for one context's watchlist.
#[derive(Clone)]
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl WatchlistStore {
    /// Create an adapter for the given browsing context.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, context: Uuid) -> Self {
        Self {
            storage,
            key: format!("{WATCHLIST_STORAGE_KEY}:{context}"),
        }
    }

    /// Read the persisted watchlist; absent or corrupt data is empty.
    #[must_use]
    pub fn load(&self) -> Vec<WatchlistEntry> {
        let Some(raw) = self.storage.get(&self.key) else {
            return Vec::new();
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "persisted watchlist is malformed; starting empty");
            Vec::new()
        })
    }

    fn save(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.storage.set(&self.key, &raw)
    }

    /// Prepend a new entry. Blank text is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn add(&self, text: &str) -> Result<(), StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let mut entries = self.load();
        entries.insert(0, WatchlistEntry::new(text));
        self.save(&entries)
    }

    /// Flip an entry's watched state. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn toggle(&self, id: Uuid) -> Result<(), StoreError> {
        let mut entries = self.load();
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) {
            entry.completed = !entry.completed;
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Rename an entry. Blank text and unknown ids are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn rename(&self, id: Uuid, text: &str) -> Result<(), StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let mut entries = self.load();
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) {
            entry.text = text.to_string();
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Delete an entry. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() != before {
            self.save(&entries)?;
        }
        Ok(())
    }
}
