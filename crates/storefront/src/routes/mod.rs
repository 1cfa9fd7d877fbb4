//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Watchlist page
//! GET  /health                 - Health check
//!
//! # Watchlist (HTMX fragments)
//! POST /watchlist/add          - Add an entry
//! POST /watchlist/toggle       - Toggle watched state
//! POST /watchlist/update       - Rename an entry
//! POST /watchlist/remove       - Delete an entry
//!
//! # Subscriptions
//! GET  /subscriptions          - Catalog page
//! POST /subscriptions/add      - Validated add-to-cart (warning fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Movies
//! GET  /movies                 - Movie search page
//! GET  /movies/results         - Search results fragment (HTMX, debounced)
//! ```

pub mod cart;
pub mod home;
pub mod movies;
pub mod subscriptions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the watchlist routes router.
pub fn watchlist_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(home::add))
        .route("/toggle", post(home::toggle))
        .route("/update", post(home::update))
        .route("/remove", post(home::remove))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the subscriptions routes router.
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(subscriptions::index))
        .route("/add", post(subscriptions::add))
}

/// Create the movies routes router.
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::index))
        .route("/results", get(movies::results))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Watchlist home page
        .route("/", get(home::index))
        .nest("/watchlist", watchlist_routes())
        // Subscriptions catalog
        .nest("/subscriptions", subscription_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Movie search
        .nest("/movies", movie_routes())
}
