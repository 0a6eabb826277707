//! HTTP client for a LanguageShop catalog API.
//!
//! Talks to `{base}/products` and `{base}/products/{id}` with `reqwest`.
//! Successful responses are cached using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use language_shop_core::{Product, ProductId};
use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogError, ProductSource};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
}

/// The list endpoint answers either a bare array or the mock API's
/// paginated wrapper.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductsPayload {
    Bare(Vec<Product>),
    Wrapped { products: Vec<Product> },
}

impl ProductsPayload {
    fn into_products(self) -> Vec<Product> {
        match self {
            Self::Bare(products) | Self::Wrapped { products } => products,
        }
    }
}

/// Client for the catalog API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `http://127.0.0.1:3000/api`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Append path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<(reqwest::StatusCode, String), CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a product list.
    #[instrument(skip(self), fields(base_url = %self.inner.base_url))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let (status, body) = self.get_text(self.endpoint(&["products"])?).await?;
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let products = serde_json::from_str::<ProductsPayload>(&body)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse product list"))?
            .into_products();
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] on HTTP 404, and other errors if
    /// the request fails or the body is not a product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let (status, body) = self
            .get_text(self.endpoint(&["products", id.as_str()])?)
            .await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(id.clone()));
        }
        if !status.is_success() {
            tracing::error!(status = %status, "Catalog API returned non-success status");
            return Err(CatalogError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let product: Product = serde_json::from_str(&body)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}

impl ProductSource for CatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Self::fetch_products(self).await
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, CatalogError> {
        Self::fetch_product_by_id(self, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> CatalogClient {
        CatalogClient::new(Url::parse(base).unwrap())
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client_for("http://127.0.0.1:3000/api");
        assert_eq!(
            client.endpoint(&["products"]).unwrap().as_str(),
            "http://127.0.0.1:3000/api/products"
        );

        let client = client_for("http://127.0.0.1:3000/api/");
        assert_eq!(
            client.endpoint(&["products", "mug-001"]).unwrap().as_str(),
            "http://127.0.0.1:3000/api/products/mug-001"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let client = client_for("http://localhost/api");
        assert_eq!(
            client.endpoint(&["products", "a/b c"]).unwrap().as_str(),
            "http://localhost/api/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let client = client_for("mailto:shop@example.com");
        assert!(matches!(
            client.endpoint(&["products"]),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_products_payload_shapes() {
        let bare = r#"[{"id":"1","name":"Mug","description":"","price":12.99,"category":"mugs","variants":[{"id":"1-one","inStock":true}]}]"#;
        let wrapped = format!(r#"{{"products":{bare},"total":1,"page":1,"limit":50}}"#);

        let from_bare = serde_json::from_str::<ProductsPayload>(bare).unwrap().into_products();
        let from_wrapped = serde_json::from_str::<ProductsPayload>(&wrapped)
            .unwrap()
            .into_products();
        assert_eq!(from_bare, from_wrapped);
        assert_eq!(from_bare[0].id.as_str(), "1");
    }

    #[test]
    fn test_products_payload_rejects_product_without_variants() {
        let bare = r#"[{"id":"1","name":"Mug","description":"","price":12.99,"category":"mugs","variants":[]}]"#;
        assert!(serde_json::from_str::<ProductsPayload>(bare).is_err());
    }
}
