//! Session-related types.
//!
//! The session stores only a browsing-context id; all durable state lives
//! in the key/value storage keyed by that id.

use tower_sessions::Session;
use uuid::Uuid;

/// Session keys.
pub mod keys {
    /// Key for the browsing-context id owning cart and watchlist state.
    pub const CART_CONTEXT: &str = "cart_context";
}

/// Get the session's browsing-context id, minting one on first use.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn context_id(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(id) = session.get::<Uuid>(keys::CART_CONTEXT).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(keys::CART_CONTEXT, id).await?;
    Ok(id)
}
