//! In-process mock catalog.

use std::path::Path;
use std::sync::Arc;

use language_shop_core::{Product, ProductId};
use tracing::info;

use super::{CatalogError, ProductSource};

const BUILTIN_PRODUCTS: &str = include_str!("../../data/products.json");

/// Products served by the mock catalog API.
///
/// Cloning shares the product list.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    products: Arc<[Product]>,
}

impl MockCatalog {
    /// The three built-in products (hoodie, t-shirt, mug).
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded product data fails to parse.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if `json` is not a product array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::from_products(products))
    }

    /// Load a JSON array of products from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), products = catalog.products.len(), "Loaded catalog file");
        Ok(catalog)
    }

    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products matching the mock API's query parameters.
    ///
    /// A missing or `all` category matches every product. `search` is a
    /// case-insensitive substring of the name or description.
    #[must_use]
    pub fn search(&self, category: Option<&str>, search: Option<&str>) -> Vec<&Product> {
        let category = category.filter(|c| !c.is_empty() && *c != "all");
        let search = search.filter(|s| !s.is_empty()).map(str::to_lowercase);

        self.products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category.as_str() == c))
            .filter(|p| {
                search.as_deref().is_none_or(|q| {
                    p.name.to_lowercase().contains(q) || p.description.to_lowercase().contains(q)
                })
            })
            .collect()
    }
}

impl ProductSource for MockCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.to_vec())
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}
