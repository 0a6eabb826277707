//! Product listing and detail route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use language_shop_core::{
    Category, FilterCriteria, Price, Product, ProductId, ProductVariant, Size, available_categories,
    available_colors, filter_products,
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::ProductSource;
use crate::error::Result;
use crate::state::AppState;

/// Shown on the detail page when no variant can be purchased.
pub const OUT_OF_STOCK_MESSAGE: &str = "This product is currently out of stock.";

/// Product card display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub formatted_price: String,
    pub thumbnail: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category,
            price: product.price,
            formatted_price: product.price.to_string(),
            thumbnail: product.thumbnail().map(String::from),
            in_stock: product.has_stock(),
        }
    }
}

/// A category facet option.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOption {
    pub value: Category,
    pub label: String,
}

/// Product listing display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductCardView>,
    pub total: usize,
    pub criteria: FilterCriteria,
    pub categories: Vec<CategoryOption>,
    pub colors: Vec<String>,
    pub sizes: Vec<&'static str>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Variant selector option.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantView {
    pub id: String,
    pub label: String,
    pub size: Option<Size>,
    pub color: Option<String>,
    pub in_stock: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.to_string(),
            label: variant.label(),
            size: variant.size,
            color: variant.color.clone(),
            in_stock: variant.in_stock,
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailView {
    pub product: Product,
    pub formatted_price: String,
    pub category_label: String,
    pub variants: Vec<VariantView>,
    /// The first in-stock variant, if any.
    pub selected_variant_id: Option<String>,
    pub error: Option<&'static str>,
}

impl From<Product> for ProductDetailView {
    fn from(product: Product) -> Self {
        let selected_variant_id = product.first_in_stock_variant().map(|v| v.id.to_string());
        let error = selected_variant_id.is_none().then_some(OUT_OF_STOCK_MESSAGE);

        Self {
            formatted_price: product.price.to_string(),
            category_label: product.category.label(),
            variants: product.variants.iter().map(VariantView::from).collect(),
            selected_variant_id,
            error,
            product,
        }
    }
}

/// Catalog load status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatusView {
    pub products: usize,
    pub loading: bool,
    pub error: Option<String>,
}

/// Product listing filtered by the current criteria.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<ProductListView> {
    let catalog = state.catalog().read().await;
    let criteria = state.filters().read().await.clone();

    let products: Vec<ProductCardView> = filter_products(catalog.products(), &criteria)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    Json(ProductListView {
        total: products.len(),
        products,
        criteria,
        categories: available_categories(catalog.products())
            .into_iter()
            .map(|c| CategoryOption {
                value: c,
                label: c.label(),
            })
            .collect(),
        colors: available_colors(catalog.products()),
        sizes: Size::ALL.iter().map(Size::as_str).collect(),
        loading: catalog.is_loading(),
        error: catalog.error().map(String::from),
    })
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailView>> {
    let product = state
        .catalog_source()
        .fetch_product_by_id(&ProductId::new(id))
        .await?;

    Ok(Json(ProductDetailView::from(product)))
}

/// Re-fetch the catalog.
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Json<CatalogStatusView> {
    state.reload_catalog().await;

    let catalog = state.catalog().read().await;
    Json(CatalogStatusView {
        products: catalog.products().len(),
        loading: catalog.is_loading(),
        error: catalog.error().map(String::from),
    })
}
