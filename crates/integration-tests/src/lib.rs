//! Integration tests for EZTech.
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart engine behavior (add, merge,
//!   reject, clear)
//! - `cross_context` - Multi-context storage sharing, change events, and
//!   the documented last-write-wins policy
//! - `persistence` - Round trips through both storage backends and
//!   failure recovery
//! - `storefront_flow` - Catalog + registry + validation wired the way
//!   the storefront uses them
//!
//! Shared builders for catalog fixtures live here so every test speaks
//! the same product language.

use rust_decimal::Decimal;

use eztech_core::{CatalogItem, ItemId};

/// A subscription plan (reserved low id range, ids 1-4).
#[must_use]
pub fn subscription(id: i64, service: &str, price_cents: i64, amount: u32) -> CatalogItem {
    debug_assert!(ItemId::new(id).is_subscription());
    catalog_item(id, service, price_cents, amount)
}

/// An accessory (outside the subscription range).
#[must_use]
pub fn accessory(id: i64, service: &str, price_cents: i64, amount: u32) -> CatalogItem {
    debug_assert!(!ItemId::new(id).is_subscription());
    catalog_item(id, service, price_cents, amount)
}

fn catalog_item(id: i64, service: &str, price_cents: i64, amount: u32) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        service: service.to_string(),
        service_info: None,
        price: Decimal::new(price_cents, 2),
        amount,
        img: String::new(),
    }
}
