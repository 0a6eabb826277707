//! Application state shared across handlers.

use std::sync::Arc;

use language_shop_core::{Cart, CartStorage, FilterCriteria};
use tokio::sync::{Mutex, RwLock};

use crate::catalog::{CatalogClient, CatalogSource, CatalogStore, MockCatalog, ProductSource};
use crate::config::StorefrontConfig;

/// Storage handle shared by the cart.
pub type SharedStorage = Arc<dyn CartStorage + Send + Sync>;

/// The cart type held in application state.
pub type SharedCart = Cart<SharedStorage>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each state container sits
/// behind its own lock, so mutations of one container are serialized and
/// the last writer wins.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    mock_catalog: MockCatalog,
    source: CatalogSource,
    catalog: RwLock<CatalogStore>,
    filters: RwLock<FilterCriteria>,
    cart: Mutex<SharedCart>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The cart is hydrated from `storage` immediately. The catalog store
    /// starts empty; call [`reload_catalog`](Self::reload_catalog) to fill
    /// it.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `mock_catalog` - Products served by the mock catalog API
    /// * `storage` - Durable storage for the cart
    #[must_use]
    pub fn new(config: StorefrontConfig, mock_catalog: MockCatalog, storage: SharedStorage) -> Self {
        let source = config.catalog_api_url.clone().map_or_else(
            || CatalogSource::Mock(mock_catalog.clone()),
            |url| CatalogSource::Remote(CatalogClient::new(url)),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                mock_catalog,
                source,
                catalog: RwLock::new(CatalogStore::new()),
                filters: RwLock::new(FilterCriteria::new()),
                cart: Mutex::new(Cart::open(storage)),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Products served by the mock catalog API.
    #[must_use]
    pub fn mock_catalog(&self) -> &MockCatalog {
        &self.inner.mock_catalog
    }

    /// Where the catalog store loads products from.
    #[must_use]
    pub fn catalog_source(&self) -> &CatalogSource {
        &self.inner.source
    }

    #[must_use]
    pub fn catalog(&self) -> &RwLock<CatalogStore> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn filters(&self) -> &RwLock<FilterCriteria> {
        &self.inner.filters
    }

    #[must_use]
    pub fn cart(&self) -> &Mutex<SharedCart> {
        &self.inner.cart
    }

    /// Re-fetch the catalog from the configured source.
    ///
    /// The store lock is not held while the fetch is in flight, so readers
    /// observe `loading = true` in the meantime.
    pub async fn reload_catalog(&self) {
        if let CatalogSource::Remote(client) = &self.inner.source {
            client.invalidate_cache();
        }

        self.inner.catalog.write().await.begin_load();
        let result = self.inner.source.fetch_products().await;
        self.inner.catalog.write().await.finish_load(result);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use language_shop_core::MemoryStorage;

    #[tokio::test]
    async fn test_reload_catalog_from_mock() {
        let state = AppState::new(
            StorefrontConfig::default(),
            MockCatalog::builtin().unwrap(),
            Arc::new(MemoryStorage::new()),
        );
        assert!(state.catalog().read().await.products().is_empty());

        state.reload_catalog().await;

        let catalog = state.catalog().read().await;
        assert_eq!(catalog.products().len(), 3);
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_cart_is_hydrated_on_creation() {
        let storage = MemoryStorage::new();
        Cart::open(storage.clone()).add_item("mug-001", "m001-one");

        let state = AppState::new(
            StorefrontConfig::default(),
            MockCatalog::builtin().unwrap(),
            Arc::new(storage),
        );

        let cart = state.cart().lock().await;
        assert!(cart.has_hydrated());
        assert_eq!(cart.total_items(), 1);
    }
}
