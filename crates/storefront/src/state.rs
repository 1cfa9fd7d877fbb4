//! Application state shared across handlers.

use std::sync::Arc;

use uuid::Uuid;

use eztech_cart::{FileStore, KeyValueStore, StoreError};
use eztech_core::{CatalogItem, ItemId};

use crate::carts::CartRegistry;
use crate::catalog;
use crate::config::StorefrontConfig;
use crate::models::WatchlistStore;
use crate::services::tmdb::{TmdbClient, TmdbError};

/// File name of the durable key/value storage inside the data directory.
const STORAGE_FILE: &str = "storefront.json";

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("tmdb client error: {0}")]
    Tmdb(#[from] TmdbError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the cart registry and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Vec<CatalogItem>,
    storage: Arc<dyn KeyValueStore>,
    carts: CartRegistry,
    tmdb: Option<TmdbClient>,
}

impl AppState {
    /// Create a new application state backed by file storage under the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be opened or the TMDB
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(config.data_dir.join(STORAGE_FILE))?);
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the TMDB client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StateError> {
        let carts = CartRegistry::new(Arc::clone(&storage));
        let tmdb = config
            .tmdb
            .as_ref()
            .map(TmdbClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: catalog::catalog(),
                storage,
                carts,
                tmdb,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the static product catalog.
    #[must_use]
    pub fn catalog(&self) -> &[CatalogItem] {
        &self.inner.catalog
    }

    /// Find a catalog entry by id.
    #[must_use]
    pub fn find_item(&self, id: ItemId) -> Option<&CatalogItem> {
        self.inner.catalog.iter().find(|item| item.id == id)
    }

    /// Get the cart engine registry.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry {
        &self.inner.carts
    }

    /// Get the watchlist store for a browsing context.
    #[must_use]
    pub fn watchlist(&self, context: Uuid) -> WatchlistStore {
        WatchlistStore::new(Arc::clone(&self.inner.storage), context)
    }

    /// Get the TMDB client, if movie search is configured.
    #[must_use]
    pub fn tmdb(&self) -> Option<&TmdbClient> {
        self.inner.tmdb.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use eztech_cart::MemoryStore;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: std::path::PathBuf::from("./data"),
            tmdb: None,
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_find_item() {
        let state =
            AppState::with_storage(test_config(), Arc::new(MemoryStore::new())).unwrap();

        assert!(state.find_item(ItemId::new(1)).is_some());
        assert!(state.find_item(ItemId::new(404)).is_none());
    }

    #[test]
    fn test_tmdb_disabled_without_key() {
        let state =
            AppState::with_storage(test_config(), Arc::new(MemoryStore::new())).unwrap();
        assert!(state.tmdb().is_none());
    }
}
