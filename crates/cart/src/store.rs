//! Durable key/value storage port and the cart's persistence adapter.
//!
//! The storage port mirrors browser local storage: synchronous get/set of
//! string blobs under well-known keys. Backends never surface corruption
//! to the cart; a blob that fails to parse is treated as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::warn;

use eztech_core::CartItem;

/// Well-known storage key for the persisted cart blob.
pub const CART_STORAGE_KEY: &str = "cart.items";

/// Errors from the durable storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed (disk full, permissions).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a value for storage failed.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous key/value storage of string blobs.
///
/// Reads are infallible: a backend that cannot produce a value reports it
/// as absent. Writes surface errors so callers can decide whether to log
/// and continue (the cart engine does) or propagate.
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot complete the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the blob under `key`. Deleting an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot complete the delete.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage backend for tests and ephemeral contexts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// File-backed storage: one JSON map file holding every key.
///
/// The file is loaded once at open; a file that fails to parse starts the
/// store empty rather than failing the open. Writes rewrite the whole map
/// through a temp file + rename so a crash mid-write cannot leave a
/// half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) a file-backed store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// existing file cannot be read. A present-but-corrupt file is not an
    /// error; it is logged and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding corrupt storage file");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrite the backing file from the in-memory map.
    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Persistence adapter for one cart blob.
///
/// Isolates the engine from storage failures: `load` swallows anything
/// that cannot be turned into a valid cart, and `save` surfaces write
/// errors for the engine to log without propagating.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl CartStore {
    /// Create an adapter persisting under `key` in `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key this adapter persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted cart.
    ///
    /// Absent, malformed, or invariant-violating data (duplicate ids,
    /// zero quantities) yields an empty cart, never an error.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        let Some(raw) = self.storage.get(&self.key) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<CartItem>>(&raw) {
            Ok(items) if cart_is_valid(&items) => items,
            Ok(_) => {
                warn!(key = %self.key, "persisted cart violates invariants; starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "persisted cart is malformed; starting empty");
                Vec::new()
            }
        }
    }

    /// Serialize and write the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the underlying write fails;
    /// the in-memory cart stays authoritative for the session either way.
    pub fn save(&self, items: &[CartItem]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set(&self.key, &raw)
    }
}

/// Unique ids, every quantity >= 1.
fn cart_is_valid(items: &[CartItem]) -> bool {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .all(|item| item.quantity >= 1 && seen.insert(item.id))
}
