//! Static subscriptions & accessories catalog.
//!
//! Ids 1-4 are the subscription plans (the reserved exclusivity range);
//! everything above is an accessory. Prices are decimal from the start so
//! cart totals never round-trip through floats.

use rust_decimal::Decimal;

use eztech_core::{CatalogItem, ItemId};

fn item(
    id: i64,
    service: &str,
    service_info: &str,
    price_cents: i64,
    amount: u32,
    img: &str,
) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        service: service.to_string(),
        service_info: Some(service_info.to_string()),
        price: Decimal::new(price_cents, 2),
        amount,
        img: format!("/static/img/{img}"),
    }
}

/// The full product list, in display order.
#[must_use]
pub fn catalog() -> Vec<CatalogItem> {
    vec![
        item(1, "Basic", "One screen, SD streaming", 999, 10, "basic.svg"),
        item(2, "Gold", "Two screens, HD streaming", 1499, 10, "gold.svg"),
        item(
            3,
            "Premium",
            "Four screens, Ultra HD streaming",
            1999,
            10,
            "premium.svg",
        ),
        item(
            4,
            "Family",
            "Six screens, Ultra HD, kids profiles",
            2499,
            10,
            "family.svg",
        ),
        item(
            5,
            "HDMI Cable",
            "6 ft braided, 4K capable",
            1299,
            25,
            "hdmi.svg",
        ),
        item(
            6,
            "Streaming Remote",
            "Voice control, backlit keys",
            2999,
            8,
            "remote.svg",
        ),
        item(
            7,
            "HD Webcam",
            "1080p with privacy shutter",
            4999,
            5,
            "webcam.svg",
        ),
        item(
            8,
            "Game Controller",
            "Bluetooth, rechargeable",
            5999,
            0,
            "controller.svg",
        ),
    ]
}
