//! The most recently loaded catalog.

use language_shop_core::Product;
use serde::Serialize;
use tracing::{info, warn};

use super::CatalogError;

/// Products plus the status of the last load.
///
/// A failed load keeps the previously loaded products and records the
/// error message.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStore {
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a load as started and clear the previous error.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record the outcome of a load started with [`begin_load`](Self::begin_load).
    pub fn finish_load(&mut self, result: Result<Vec<Product>, CatalogError>) {
        match result {
            Ok(products) => {
                info!(count = products.len(), "Catalog loaded");
                self.products = products;
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }
}
