//! Per-browsing-context cart engine registry.
//!
//! Each visitor session owns one [`CartEngine`], the single source of
//! truth for that context. Engines are cached with idle eviction; an
//! evicted engine simply rehydrates from the durable store on the next
//! request, so eviction never loses committed state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use eztech_cart::{CART_STORAGE_KEY, CartEngine, CartStore, KeyValueStore};

/// Shared, lockable handle to one context's engine.
pub type CartHandle = Arc<Mutex<CartEngine>>;

/// Upper bound on concurrently hydrated engines.
const MAX_HYDRATED_ENGINES: u64 = 10_000;

/// Idle time before an engine is evicted (and later rehydrated).
const ENGINE_IDLE_EVICTION: Duration = Duration::from_secs(12 * 60 * 60);

/// Registry of cart engines, one per browsing context.
#[derive(Clone)]
pub struct CartRegistry {
    storage: Arc<dyn KeyValueStore>,
    engines: Cache<Uuid, CartHandle>,
}

impl CartRegistry {
    /// Create a registry persisting carts into `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            engines: Cache::builder()
                .max_capacity(MAX_HYDRATED_ENGINES)
                .time_to_idle(ENGINE_IDLE_EVICTION)
                .build(),
        }
    }

    /// Get (or hydrate) the engine for `context`.
    #[must_use]
    pub fn engine(&self, context: Uuid) -> CartHandle {
        self.engines.get_with(context, || {
            let store = CartStore::new(
                Arc::clone(&self.storage),
                format!("{CART_STORAGE_KEY}:{context}"),
            );
            Arc::new(Mutex::new(CartEngine::new(store)))
        })
    }
}

/// Lock a cart handle for a run-to-completion mutation.
///
/// Never held across an await point; cart operations are synchronous.
pub fn lock_engine(handle: &CartHandle) -> MutexGuard<'_, CartEngine> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eztech_cart::MemoryStore;
    use eztech_core::{CatalogItem, ItemId};
    use rust_decimal::Decimal;

    fn plan() -> CatalogItem {
        CatalogItem {
            id: ItemId::new(1),
            service: "Basic".to_string(),
            service_info: None,
            price: Decimal::new(999, 2),
            amount: 3,
            img: String::new(),
        }
    }

    #[test]
    fn test_same_context_same_engine() {
        let registry = CartRegistry::new(Arc::new(MemoryStore::new()));
        let context = Uuid::new_v4();

        let a = registry.engine(context);
        lock_engine(&a).try_add(&plan(), 1).unwrap();

        let b = registry.engine(context);
        assert_eq!(lock_engine(&b).count(), 1);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let registry = CartRegistry::new(Arc::new(MemoryStore::new()));

        let a = registry.engine(Uuid::new_v4());
        lock_engine(&a).try_add(&plan(), 1).unwrap();

        let b = registry.engine(Uuid::new_v4());
        assert!(lock_engine(&b).is_empty());
    }

    #[test]
    fn test_evicted_engine_rehydrates_from_store() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let context = Uuid::new_v4();

        {
            let registry = CartRegistry::new(Arc::clone(&storage));
            let handle = registry.engine(context);
            lock_engine(&handle).try_add(&plan(), 2).unwrap();
        }

        // A fresh registry (same durable storage) sees the committed cart.
        let registry = CartRegistry::new(storage);
        let handle = registry.engine(context);
        assert_eq!(lock_engine(&handle).count(), 2);
    }
}
