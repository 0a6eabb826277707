//! Product catalog: data sources and the in-memory store.
//!
//! A [`ProductSource`] answers "all products" and "one product by ID". Two
//! sources exist:
//!
//! - [`MockCatalog`] - in-process products (built-in or loaded from JSON)
//! - [`CatalogClient`] - HTTP client for a catalog API, with a 5-minute cache
//!
//! [`CatalogStore`] holds the most recent fetch result for the routes.

pub mod client;
pub mod mock;
pub mod store;

use std::future::Future;

use language_shop_core::{Product, ProductId};
use thiserror::Error;

pub use client::CatalogClient;
pub use mock::MockCatalog;
pub use store::CatalogStore;

/// Errors that can occur when fetching catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has the requested ID.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The catalog API answered with a non-success status.
    #[error("Failed to fetch products: HTTP {status}")]
    FetchFailed { status: u16 },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    /// Reading a catalog file failed.
    #[error("Catalog file error: {0}")]
    Io(#[from] std::io::Error),
}

/// A provider of catalog products.
pub trait ProductSource: Send + Sync {
    /// Fetch every product.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch one product.
    ///
    /// Returns [`CatalogError::NotFound`] when no product has `id`.
    fn fetch_product_by_id(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}

/// The source the storefront loads its catalog from.
#[derive(Clone)]
pub enum CatalogSource {
    Mock(MockCatalog),
    Remote(CatalogClient),
}

impl ProductSource for CatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        match self {
            Self::Mock(mock) => mock.fetch_products().await,
            Self::Remote(client) => client.fetch_products().await,
        }
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, CatalogError> {
        match self {
            Self::Mock(mock) => mock.fetch_product_by_id(id).await,
            Self::Remote(client) => client.fetch_product_by_id(id).await,
        }
    }
}
