//! Mock catalog REST API.
//!
//! Serves the in-process [`MockCatalog`](crate::catalog::MockCatalog) the
//! way a real catalog backend would, including optional artificial latency.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use language_shop_core::{Product, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::state::AppState;

/// Page size reported by the list endpoint. Results are never paginated.
const PAGE_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage<'a> {
    pub products: Vec<&'a Product>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

async fn simulate_latency(state: &AppState) {
    let latency = state.config().mock_latency;
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// `GET /api/products?category=&search=`
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Response {
    simulate_latency(&state).await;

    let products = state
        .mock_catalog()
        .search(query.category.as_deref(), query.search.as_deref());
    debug!(count = products.len(), "Serving mock products");

    Json(ProductPage {
        total: products.len(),
        products,
        page: 1,
        limit: PAGE_LIMIT,
    })
    .into_response()
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    simulate_latency(&state).await;

    match state.mock_catalog().get(&ProductId::new(id)) {
        Some(product) => Json(product).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Product not found", "code": "PRODUCT_NOT_FOUND" })),
        )
            .into_response(),
    }
}
