//! EZTech Cart - Shared cart state engine.
//!
//! The single source of truth for cart contents: its mutation protocol,
//! its persistence to durable key/value storage, and its cross-view /
//! cross-context synchronization.
//!
//! # Architecture
//!
//! - [`store`] - Durable storage port ([`KeyValueStore`]) with in-memory
//!   and file-backed implementations, plus the [`CartStore`] adapter that
//!   owns the JSON cart blob under its well-known key.
//! - [`engine`] - [`CartEngine`], the owning handle for one browsing
//!   context's cart. Every mutation runs to completion, persists, then
//!   notifies.
//! - [`notify`] - [`ChangeBus`], the no-payload "cart changed" broadcast
//!   consumed by badge and summary views within the same context.
//! - [`shared`] - [`SharedStorage`], one durable store observed by several
//!   contexts; a write from one context fans a [`StorageEvent`] out to
//!   every *other* context after the write completes.
//! - [`policy`] - Add-to-cart business rules (subscription exclusivity and
//!   stock limits) evaluated before the engine commits.
//! - [`summary`] - Pure projections of the canonical cart (item count,
//!   total price), recomputed on demand and never cached.
//!
//! # Consistency model
//!
//! One engine per browsing context. Contexts sharing a store converge by
//! re-reading persisted state when notified; concurrent writers resolve
//! last-write-wins at the storage layer. This is accepted, documented
//! behavior, not a defect to patch here.
//!
//! # Example
//!
//! ```
//! use eztech_cart::{CART_STORAGE_KEY, CartEngine, CartStore, MemoryStore};
//! use eztech_core::{CatalogItem, ItemId};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let storage = Arc::new(MemoryStore::new());
//! let mut engine = CartEngine::new(CartStore::new(storage, CART_STORAGE_KEY));
//!
//! let plan = CatalogItem {
//!     id: ItemId::new(1),
//!     service: "Basic".to_string(),
//!     service_info: None,
//!     price: Decimal::new(999, 2),
//!     amount: 3,
//!     img: String::new(),
//! };
//! engine.try_add(&plan, 1).expect("within stock");
//! assert_eq!(engine.count(), 1);
//! assert_eq!(engine.total(), Decimal::new(999, 2));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod engine;
pub mod notify;
pub mod policy;
pub mod shared;
pub mod store;
pub mod summary;

pub use engine::CartEngine;
pub use notify::ChangeBus;
pub use policy::{AddRejected, check_add};
pub use shared::{ContextStorage, SharedStorage, StorageEvent};
pub use store::{CART_STORAGE_KEY, CartStore, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use summary::{CartSummary, summarize};
