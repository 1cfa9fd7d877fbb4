//! Property tests for the cart engine's structural invariants.
//!
//! For any sequence of add/remove/update operations, after every prefix:
//! ids are unique, every quantity is >= 1, and the persisted blob parses
//! back to exactly the in-memory cart.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use eztech_cart::{CART_STORAGE_KEY, CartEngine, CartStore, MemoryStore};
use eztech_core::{CartItem, CatalogItem, ItemId};

#[derive(Debug, Clone)]
enum Op {
    Add { id: i64, quantity: u32 },
    Remove { id: i64 },
    Update { id: i64, quantity: i64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // A small id space forces frequent merges, removals of present lines,
    // and updates of both present and absent ids.
    prop_oneof![
        (0..8i64, 0..5u32).prop_map(|(id, quantity)| Op::Add { id, quantity }),
        (0..8i64).prop_map(|id| Op::Remove { id }),
        (0..8i64, -3..8i64).prop_map(|(id, quantity)| Op::Update { id, quantity }),
    ]
}

fn catalog_item(id: i64) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        service: format!("Service {id}"),
        service_info: None,
        price: Decimal::new(id * 100 + 99, 2),
        amount: 100,
        img: String::new(),
    }
}

fn assert_invariants(engine: &CartEngine, store: &CartStore) {
    let mut seen = HashSet::new();
    for item in engine.items() {
        assert!(seen.insert(item.id), "duplicate id {} in cart", item.id);
        assert!(item.quantity >= 1, "stored quantity below 1");
    }

    // Persisted and in-memory representations stay reconcilable.
    assert_eq!(store.load(), engine.items());
}

proptest! {
    #[test]
    fn invariants_hold_after_every_prefix(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(MemoryStore::new());
        let store = CartStore::new(storage, CART_STORAGE_KEY);
        let mut engine = CartEngine::new(store.clone());

        for op in ops {
            match op {
                Op::Add { id, quantity } => {
                    engine.add(CartItem::from_catalog(&catalog_item(id), quantity));
                }
                Op::Remove { id } => engine.remove(ItemId::new(id)),
                Op::Update { id, quantity } => engine.update_quantity(ItemId::new(id), quantity),
            }
            assert_invariants(&engine, &store);
        }
    }

    #[test]
    fn totals_never_drift_from_items(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let storage = Arc::new(MemoryStore::new());
        let mut engine = CartEngine::new(CartStore::new(storage, CART_STORAGE_KEY));

        for op in ops {
            match op {
                Op::Add { id, quantity } => {
                    engine.add(CartItem::from_catalog(&catalog_item(id), quantity));
                }
                Op::Remove { id } => engine.remove(ItemId::new(id)),
                Op::Update { id, quantity } => engine.update_quantity(ItemId::new(id), quantity),
            }

            let expected_count: u64 = engine.items().iter().map(|i| u64::from(i.quantity)).sum();
            let expected_total: Decimal = engine.items().iter().map(CartItem::line_total).sum();
            assert_eq!(engine.count(), expected_count);
            assert_eq!(engine.total(), expected_total);
        }
    }
}
