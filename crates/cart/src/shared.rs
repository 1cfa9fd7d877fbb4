//! Cross-context storage sharing.
//!
//! Models several browsing contexts observing one durable store. Each
//! context attached to a [`SharedStorage`] gets its own [`ContextStorage`]
//! view; a write through one view delivers a [`StorageEvent`] to every
//! *other* attached context, only after the underlying write completed.
//! That is the whole cross-context protocol: no payload, no push of
//! individual mutations - a notified context re-reads persisted state.
//!
//! Concurrent writers from different contexts resolve last-write-wins at
//! the storage layer; divergence between in-memory carts is transient and
//! closes when each context re-reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::store::{KeyValueStore, StoreError};

/// Per-context event channel capacity.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A key in the shared store was written from another context.
///
/// Carries only the key; consumers filter for the key they care about and
/// re-read persisted state to learn what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The storage key that was written or removed.
    pub key: String,
}

struct Peer {
    context: u64,
    sender: broadcast::Sender<StorageEvent>,
}

struct SharedInner {
    store: Box<dyn KeyValueStore>,
    peers: Mutex<Vec<Peer>>,
    next_context: AtomicU64,
}

impl SharedInner {
    fn peers(&self) -> MutexGuard<'_, Vec<Peer>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One durable store observed by several contexts.
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<SharedInner>,
}

impl SharedStorage {
    /// Wrap a storage backend for multi-context observation.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                store: Box::new(store),
                peers: Mutex::new(Vec::new()),
                next_context: AtomicU64::new(0),
            }),
        }
    }

    /// Attach a new context.
    ///
    /// The returned view reads and writes the shared store and receives
    /// [`StorageEvent`]s for writes made by every other context.
    #[must_use]
    pub fn attach(&self) -> ContextStorage {
        let context = self.inner.next_context.fetch_add(1, Ordering::Relaxed);
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        self.inner.peers().push(Peer { context, sender });

        ContextStorage {
            inner: Arc::clone(&self.inner),
            context,
        }
    }

    /// Number of currently attached contexts.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.inner.peers().len()
    }
}

/// One context's view of a [`SharedStorage`].
pub struct ContextStorage {
    inner: Arc<SharedInner>,
    context: u64,
}

impl ContextStorage {
    /// Subscribe to storage events fired by *other* contexts.
    ///
    /// A context never observes its own writes here, mirroring how native
    /// storage-change notifications fire only in other browsing contexts.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<StorageEvent> {
        let peers = self.inner.peers();
        peers
            .iter()
            .find(|peer| peer.context == self.context)
            .map_or_else(
                // Detached contexts get a channel that never fires.
                || broadcast::channel(1).1,
                |peer| peer.sender.subscribe(),
            )
    }

    /// Deliver an event to every context except this one.
    ///
    /// Called after the underlying write completed, so a consumer that
    /// re-reads on receipt always observes state at least as fresh as the
    /// write that triggered the event.
    fn fan_out(&self, key: &str) {
        let peers = self.inner.peers();
        for peer in peers.iter().filter(|peer| peer.context != self.context) {
            let _ = peer.sender.send(StorageEvent {
                key: key.to_string(),
            });
        }
    }
}

impl KeyValueStore for ContextStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.store.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.store.set(key, value)?;
        self.fan_out(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.store.remove(key)?;
        self.fan_out(key);
        Ok(())
    }
}

impl Drop for ContextStorage {
    fn drop(&mut self) {
        self.inner
            .peers()
            .retain(|peer| peer.context != self.context);
    }
}
