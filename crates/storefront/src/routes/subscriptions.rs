//! Subscriptions & accessories catalog page and validated add-to-cart.
//!
//! Adds run through the cart engine's business rules. A rejection renders
//! the warning banner fragment with the rule's message and leaves the cart
//! untouched; a successful add clears the banner and fires the
//! `cart-updated` trigger so the nav badge re-reads its count.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use eztech_core::{CatalogItem, ItemId};

use crate::carts::lock_engine;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::session::context_id;
use crate::state::AppState;

/// Catalog entry display data for templates.
#[derive(Clone)]
pub struct CatalogItemView {
    pub id: i64,
    pub service: String,
    pub service_info: Option<String>,
    pub price: Decimal,
    pub amount: u32,
    pub img: String,
}

impl From<&CatalogItem> for CatalogItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.as_i64(),
            service: item.service.clone(),
            service_info: item.service_info.clone(),
            price: item.price,
            amount: item.amount,
            img: item.img.clone(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: i64,
    pub quantity: Option<u32>,
}

/// Subscriptions page template.
#[derive(Template, WebTemplate)]
#[template(path = "subscriptions.html")]
pub struct SubscriptionsTemplate {
    pub items: Vec<CatalogItemView>,
    pub warning: Option<String>,
}

/// Warning banner fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_warning.html")]
pub struct CartWarningTemplate {
    pub warning: Option<String>,
}

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    SubscriptionsTemplate {
        items: state.catalog().iter().map(CatalogItemView::from).collect(),
        warning: None,
    }
    .into_response()
}

/// Add a catalog item to the cart (HTMX).
///
/// Returns the warning banner fragment: empty on success (plus the
/// `cart-updated` trigger), or the rejection message with no trigger.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let item = state
        .find_item(ItemId::new(form.item_id))
        .ok_or_else(|| AppError::NotFound(format!("catalog item {}", form.item_id)))?
        .clone();
    let quantity = form.quantity.unwrap_or(1);

    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);
    let outcome = lock_engine(&handle).try_add(&item, quantity);

    match outcome {
        Ok(()) => Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartWarningTemplate { warning: None },
        )
            .into_response()),
        Err(rejection) => Ok(CartWarningTemplate {
            warning: Some(format!("Warning: {rejection}")),
        }
        .into_response()),
    }
}
