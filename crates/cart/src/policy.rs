//! Add-to-cart business rules.
//!
//! Evaluated on add intents only, before the engine commits. Exactly one
//! rejection is surfaced per attempt, in priority order: subscription
//! exclusivity, then out-of-stock, then exceeds-available. A rejected add
//! leaves the cart untouched; there is no partial fulfillment.

use thiserror::Error;

use eztech_core::CatalogItem;

/// Why an add-to-cart attempt was refused.
///
/// The `Display` strings are user-facing warning messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddRejected {
    /// A subscription plan is already in the cart; only one unit at a
    /// time is allowed.
    #[error("Only one {service} subscription is allowed at a time.")]
    SubscriptionHeld {
        /// Display name of the plan.
        service: String,
    },

    /// The catalog reports no purchasable stock.
    #[error("{service} is out of stock.")]
    OutOfStock {
        /// Display name of the product.
        service: String,
    },

    /// Cart quantity plus the requested amount exceeds available stock.
    #[error("Only {available} {service} available.")]
    ExceedsStock {
        /// Display name of the product.
        service: String,
        /// Maximum purchasable quantity.
        available: u32,
    },
}

/// Check whether `requested` more units of `item` may be added to a cart
/// already holding `in_cart` units of it.
///
/// # Errors
///
/// Returns the first violated rule, in priority order.
pub fn check_add(item: &CatalogItem, requested: u32, in_cart: u32) -> Result<(), AddRejected> {
    if item.is_subscription() && in_cart > 0 {
        return Err(AddRejected::SubscriptionHeld {
            service: item.service.clone(),
        });
    }

    if item.amount == 0 {
        return Err(AddRejected::OutOfStock {
            service: item.service.clone(),
        });
    }

    if u64::from(in_cart) + u64::from(requested) > u64::from(item.amount) {
        return Err(AddRejected::ExceedsStock {
            service: item.service.clone(),
            available: item.amount,
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eztech_core::ItemId;
    use rust_decimal::Decimal;

    fn item(id: i64, amount: u32) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(id),
            service: "Basic".to_string(),
            service_info: None,
            price: Decimal::new(999, 2),
            amount,
            img: String::new(),
        }
    }

    #[test]
    fn test_first_add_within_stock() {
        assert!(check_add(&item(10, 3), 1, 0).is_ok());
        assert!(check_add(&item(10, 3), 3, 0).is_ok());
    }

    #[test]
    fn test_subscription_second_add_rejected() {
        let plan = item(2, 5);
        let rejection = check_add(&plan, 1, 1).unwrap_err();
        assert_eq!(
            rejection,
            AddRejected::SubscriptionHeld {
                service: "Basic".to_string()
            }
        );
        assert_eq!(
            rejection.to_string(),
            "Only one Basic subscription is allowed at a time."
        );
    }

    #[test]
    fn test_subscription_first_add_allowed() {
        assert!(check_add(&item(2, 5), 1, 0).is_ok());
    }

    #[test]
    fn test_out_of_stock() {
        let rejection = check_add(&item(10, 0), 1, 0).unwrap_err();
        assert_eq!(rejection.to_string(), "Basic is out of stock.");
    }

    #[test]
    fn test_exceeds_available() {
        let rejection = check_add(&item(10, 3), 2, 2).unwrap_err();
        assert_eq!(rejection.to_string(), "Only 3 Basic available.");
    }

    #[test]
    fn test_exclusivity_reported_before_stock() {
        // A held subscription that is also out of stock reports only the
        // exclusivity violation.
        let rejection = check_add(&item(1, 0), 1, 1).unwrap_err();
        assert!(matches!(rejection, AddRejected::SubscriptionHeld { .. }));
    }

    #[test]
    fn test_out_of_stock_reported_before_exceeds() {
        let rejection = check_add(&item(10, 0), 5, 2).unwrap_err();
        assert!(matches!(rejection, AddRejected::OutOfStock { .. }));
    }
}
