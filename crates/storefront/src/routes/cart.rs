//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation responds with the cart items fragment plus an
//! `HX-Trigger: cart-updated` header; the nav badge listens for that
//! trigger and re-fetches `/cart/count`, re-reading canonical state rather
//! than trusting any pushed payload.

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

use eztech_cart::{CartEngine, summarize};
use eztech_core::{CartItem, ItemId};

use crate::carts::lock_engine;
use crate::error::Result;
use crate::models::session::context_id;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub service: String,
    pub service_info: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub img: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format a decimal amount as a price string.
fn format_price(amount: &Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&[CartItem]> for CartView {
    fn from(items: &[CartItem]) -> Self {
        let summary = summarize(items);
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: format_price(&summary.total),
            item_count: summary.count,
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i64(),
            service: item.service.clone(),
            service_info: item.service_info.clone(),
            quantity: item.quantity,
            price: format_price(&item.price),
            line_price: format_price(&item.line_total()),
            img: item.img.clone(),
        }
    }
}

fn cart_view(engine: &CartEngine) -> CartView {
    CartView::from(engine.items())
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: i64,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Cart items fragment with the badge-refresh trigger attached.
fn cart_changed_response(cart: CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);
    let cart = cart_view(&lock_engine(&handle));

    Ok(CartShowTemplate { cart }.into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of 0 removes the line, mirroring the engine's contract.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);

    let cart = {
        let mut engine = lock_engine(&handle);
        engine.update_quantity(ItemId::new(form.item_id), form.quantity);
        cart_view(&engine)
    };

    Ok(cart_changed_response(cart))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);

    let cart = {
        let mut engine = lock_engine(&handle);
        engine.remove(ItemId::new(form.item_id));
        cart_view(&engine)
    };

    Ok(cart_changed_response(cart))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);

    let cart = {
        let mut engine = lock_engine(&handle);
        engine.clear();
        cart_view(&engine)
    };

    Ok(cart_changed_response(cart))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Response> {
    let context = context_id(&session).await?;
    let handle = state.carts().engine(context);
    let count = lock_engine(&handle).count();

    Ok(CartCountTemplate { count }.into_response())
}
