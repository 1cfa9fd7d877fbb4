//! The cart state engine.
//!
//! One [`CartEngine`] per browsing context owns that context's canonical
//! cart. Consumers hold an explicit handle to the engine; there is no
//! ambient global cart. Every mutation is a complete transition from one
//! valid cart to another: it runs to completion, persists through the
//! [`CartStore`], and then signals subscribers on the context-local
//! [`ChangeBus`].
//!
//! Persistence failures are logged and swallowed - the in-memory cart
//! stays authoritative for the session - and no change signal fires for a
//! write that did not complete.

use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::warn;

use eztech_core::{CartItem, CatalogItem, ItemId};

use crate::notify::ChangeBus;
use crate::policy::{AddRejected, check_add};
use crate::store::CartStore;
use crate::summary::{CartSummary, summarize};

/// Owning handle for one browsing context's cart.
pub struct CartEngine {
    items: Vec<CartItem>,
    store: CartStore,
    changes: ChangeBus,
}

impl CartEngine {
    /// Create an engine hydrated from the store's persisted state.
    ///
    /// Absent or unusable persisted data starts the cart empty.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            items: store.load(),
            store,
            changes: ChangeBus::new(),
        }
    }

    /// The current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units of `id` currently in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, id: ItemId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map_or(0, |item| item.quantity)
    }

    /// Sum of quantities over all lines. Computed on demand, never cached.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.summary().count
    }

    /// Sum of price x quantity over all lines. Computed on demand, never
    /// cached.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.summary().total
    }

    /// Derived count and total for badge and summary views.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        summarize(&self.items)
    }

    /// Subscribe to this context's "cart changed" signals.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    /// The storage key this engine persists under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.store.key()
    }

    /// Validate an add intent against the catalog entry's rules, then add.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule (exclusivity, out-of-stock,
    /// exceeds-available); the cart is left untouched on rejection.
    pub fn try_add(&mut self, item: &CatalogItem, quantity: u32) -> Result<(), AddRejected> {
        check_add(item, quantity, self.quantity_of(item.id))?;
        self.add(CartItem::from_catalog(item, quantity));
        Ok(())
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same id exists, its quantity is incremented by
    /// the new line's quantity; otherwise the line is appended. A line
    /// with quantity 0 is malformed input and is ignored.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
        self.commit();
    }

    /// Delete the line with `id`. Removing an absent id is a no-op, not an
    /// error, which makes repeated removal idempotent.
    pub fn remove(&mut self, id: ItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.commit();
        }
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of 0 or below removes the line entirely; a quantity
    /// for an unknown id is a no-op. No upper bound is enforced here -
    /// stock limits apply at add-time only.
    pub fn update_quantity(&mut self, id: ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(line) = self.items.iter_mut().find(|item| item.id == id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.commit();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.commit();
    }

    /// Re-read persisted state, replacing the in-memory cart.
    ///
    /// This is the convergence path for a context notified that another
    /// context wrote the shared store. Subscribers are signalled so
    /// derived views recompute.
    pub fn refresh(&mut self) {
        self.items = self.store.load();
        self.changes.publish();
    }

    /// Persist the cart, then notify subscribers.
    ///
    /// A failed save keeps the in-memory cart authoritative for the
    /// session and suppresses the signal: consumers re-read persisted
    /// state, so no notification may fire before a save completes.
    fn commit(&self) {
        match self.store.save(&self.items) {
            Ok(()) => self.changes.publish(),
            Err(e) => {
                warn!(key = %self.store.key(), error = %e, "failed to persist cart; in-memory state stands");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::{CART_STORAGE_KEY, KeyValueStore, MemoryStore, StoreError};
    use std::sync::Arc;

    fn catalog_item(id: i64, price_cents: i64, amount: u32) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(id),
            service: format!("Service {id}"),
            service_info: None,
            price: Decimal::new(price_cents, 2),
            amount,
            img: String::new(),
        }
    }

    fn engine_with_memory() -> (CartEngine, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let engine = CartEngine::new(CartStore::new(storage.clone(), CART_STORAGE_KEY));
        (engine, storage)
    }

    #[test]
    fn test_add_then_count_and_total() {
        let (mut engine, _) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();

        assert_eq!(engine.count(), 1);
        assert_eq!(engine.total(), Decimal::new(999, 2));
    }

    #[test]
    fn test_repeated_add_merges_quantities() {
        let (mut engine, _) = engine_with_memory();
        let item = catalog_item(10, 500, 10);
        engine.add(CartItem::from_catalog(&item, 2));
        engine.add(CartItem::from_catalog(&item, 3));

        assert_eq!(engine.items().len(), 1);
        assert_eq!(engine.quantity_of(item.id), 5);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let (mut engine, _) = engine_with_memory();
        engine.add(CartItem::from_catalog(&catalog_item(1, 999, 3), 0));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut engine, storage) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();

        engine.remove(ItemId::new(1));
        let persisted_after_first = storage.get(CART_STORAGE_KEY);
        engine.remove(ItemId::new(1));

        assert!(engine.is_empty());
        assert_eq!(storage.get(CART_STORAGE_KEY), persisted_after_first);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let (mut engine, _) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 2).unwrap();

        engine.update_quantity(ItemId::new(1), 0);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let (mut engine, _) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 2).unwrap();

        engine.update_quantity(ItemId::new(1), -5);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let (mut engine, _) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();

        engine.update_quantity(ItemId::new(99), 5);
        assert_eq!(engine.count(), 1);
    }

    #[test]
    fn test_update_quantity_has_no_upper_bound() {
        let (mut engine, _) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();

        // Stock limits apply at add-time only.
        engine.update_quantity(ItemId::new(1), 50);
        assert_eq!(engine.quantity_of(ItemId::new(1)), 50);
    }

    #[test]
    fn test_rejected_add_leaves_cart_unchanged() {
        let (mut engine, _) = engine_with_memory();
        let item = catalog_item(10, 999, 3);
        engine.try_add(&item, 2).unwrap();

        let rejection = engine.try_add(&item, 2).unwrap_err();
        assert_eq!(rejection.to_string(), "Only 3 Service 10 available.");
        assert_eq!(engine.quantity_of(item.id), 2);
    }

    #[test]
    fn test_clear_persists_empty_collection() {
        let (mut engine, storage) = engine_with_memory();
        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();
        engine.try_add(&catalog_item(10, 500, 5), 2).unwrap();

        engine.clear();

        assert_eq!(engine.count(), 0);
        assert_eq!(engine.total(), Decimal::ZERO);
        assert_eq!(storage.get(CART_STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_mutation_publishes_change_signal() {
        let (mut engine, _) = engine_with_memory();
        let mut changes = engine.subscribe();

        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();
        assert!(changes.try_recv().is_ok());
    }

    #[test]
    fn test_noop_remove_does_not_signal() {
        let (mut engine, _) = engine_with_memory();
        let mut changes = engine.subscribe();

        engine.remove(ItemId::new(404));
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_hydrates_from_persisted_state() {
        let storage = Arc::new(MemoryStore::new());
        {
            let mut engine = CartEngine::new(CartStore::new(storage.clone(), CART_STORAGE_KEY));
            engine.try_add(&catalog_item(1, 999, 3), 2).unwrap();
        }

        let engine = CartEngine::new(CartStore::new(storage, CART_STORAGE_KEY));
        assert_eq!(engine.quantity_of(ItemId::new(1)), 2);
        assert_eq!(engine.total(), Decimal::new(1998, 2));
    }

    /// Storage double whose writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("quota exceeded")))
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("quota exceeded")))
        }
    }

    #[test]
    fn test_failed_save_keeps_memory_authoritative() {
        let mut engine = CartEngine::new(CartStore::new(Arc::new(BrokenStore), CART_STORAGE_KEY));
        let mut changes = engine.subscribe();

        engine.try_add(&catalog_item(1, 999, 3), 1).unwrap();

        // The mutation survives in memory and the user can keep going.
        assert_eq!(engine.count(), 1);
        // No signal fires for a save that did not complete.
        assert!(changes.try_recv().is_err());
    }
}
