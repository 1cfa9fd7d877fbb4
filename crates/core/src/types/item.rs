//! Catalog entries and cart line items.
//!
//! The cart's persisted representation is a JSON array of [`CartItem`]s
//! with camelCase keys; `price` serializes as a JSON number (decimal
//! arithmetic end to end, no float round-trips).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// A product as supplied by the catalog.
///
/// `amount` is the maximum purchasable quantity. It is consulted when an
/// add-to-cart is validated and is never carried into the persisted cart
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable catalog identifier.
    pub id: ItemId,
    /// Display name.
    pub service: String,
    /// Optional descriptive text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_info: Option<String>,
    /// Unit price, non-negative.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    /// Maximum purchasable quantity (0 = out of stock).
    pub amount: u32,
    /// Display asset reference, opaque to the cart.
    pub img: String,
}

impl CatalogItem {
    /// Whether this entry is a subscription plan (reserved low id range).
    #[must_use]
    pub const fn is_subscription(&self) -> bool {
        self.id.is_subscription()
    }
}

/// One line in the cart: a catalog product plus the quantity and the unit
/// price frozen at add-time.
///
/// The cart engine never rewrites `price`; it is copied from the catalog
/// when the line is created and stays fixed for the life of the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Stable catalog identifier (unique within a cart).
    pub id: ItemId,
    /// Display name.
    pub service: String,
    /// Optional descriptive text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_info: Option<String>,
    /// Unit price frozen at add-time.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
    /// Units of this product in the cart, always >= 1.
    pub quantity: u32,
    /// Display asset reference, opaque to the cart.
    pub img: String,
}

impl CartItem {
    /// Build a cart line from a catalog entry, copying the display fields
    /// and freezing the unit price.
    #[must_use]
    pub fn from_catalog(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            id: item.id,
            service: item.service.clone(),
            service_info: item.service_info.clone(),
            price: item.price,
            quantity,
            img: item.img.clone(),
        }
    }

    /// Line total (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn basic_plan() -> CatalogItem {
        CatalogItem {
            id: ItemId::new(1),
            service: "Basic".to_string(),
            service_info: Some("One screen, SD".to_string()),
            price: Decimal::new(999, 2),
            amount: 3,
            img: "/static/img/basic.png".to_string(),
        }
    }

    #[test]
    fn test_from_catalog_copies_fields() {
        let plan = basic_plan();
        let line = CartItem::from_catalog(&plan, 2);

        assert_eq!(line.id, plan.id);
        assert_eq!(line.service, plan.service);
        assert_eq!(line.service_info, plan.service_info);
        assert_eq!(line.price, plan.price);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.img, plan.img);
    }

    #[test]
    fn test_line_total() {
        let line = CartItem::from_catalog(&basic_plan(), 3);
        assert_eq!(line.line_total(), Decimal::new(2997, 2));
    }

    #[test]
    fn test_persisted_layout() {
        let line = CartItem::from_catalog(&basic_plan(), 1);
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(value["id"], serde_json::json!(1));
        assert_eq!(value["service"], serde_json::json!("Basic"));
        assert_eq!(value["serviceInfo"], serde_json::json!("One screen, SD"));
        assert_eq!(value["quantity"], serde_json::json!(1));
        // Price persists as a JSON number, not a string.
        assert!(value["price"].is_number());
    }

    #[test]
    fn test_service_info_omitted_when_absent() {
        let mut line = CartItem::from_catalog(&basic_plan(), 1);
        line.service_info = None;
        let value = serde_json::to_value(&line).unwrap();
        assert!(value.get("serviceInfo").is_none());
    }

    #[test]
    fn test_round_trip() {
        let line = CartItem::from_catalog(&basic_plan(), 2);
        let json = serde_json::to_string(&line).unwrap();
        let back: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
