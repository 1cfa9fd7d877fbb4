//! Derived projections of the canonical cart.
//!
//! Pure functions of the current line items, recomputed on every change
//! notification. There are no incremental counters anywhere that could
//! drift from the source of truth.

use rust_decimal::Decimal;
use serde::Serialize;

use eztech_core::CartItem;

/// Item count and total price derived from a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities over all lines.
    pub count: u64,
    /// Sum of unit price x quantity over all lines.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
}

/// Compute the summary for a set of cart lines.
#[must_use]
pub fn summarize(items: &[CartItem]) -> CartSummary {
    CartSummary {
        count: items.iter().map(|item| u64::from(item.quantity)).sum(),
        total: items.iter().map(CartItem::line_total).sum(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eztech_core::{CatalogItem, ItemId};

    fn line(id: i64, price_cents: i64, quantity: u32) -> CartItem {
        CartItem::from_catalog(
            &CatalogItem {
                id: ItemId::new(id),
                service: format!("Service {id}"),
                service_info: None,
                price: Decimal::new(price_cents, 2),
                amount: 10,
                img: String::new(),
            },
            quantity,
        )
    }

    #[test]
    fn test_empty_cart() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_counts_quantities_not_lines() {
        let summary = summarize(&[line(1, 999, 2), line(2, 1299, 3)]);
        assert_eq!(summary.count, 5);
    }

    #[test]
    fn test_total_is_price_times_quantity() {
        let summary = summarize(&[line(1, 999, 2), line(2, 1299, 1)]);
        assert_eq!(summary.total, Decimal::new(3297, 2));
    }
}
