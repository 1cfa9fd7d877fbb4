//! Domain models for storefront.

pub mod session;
pub mod watchlist;

pub use session::keys as session_keys;
pub use watchlist::{WatchlistEntry, WatchlistStore};
