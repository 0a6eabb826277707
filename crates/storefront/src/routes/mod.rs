//! HTTP route handlers for the storefront.
//!
//! All responses are JSON view models.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Catalog loaded
//!
//! # Products
//! GET  /products                - Filtered listing with facets
//! GET  /products/{id}           - Product detail
//! POST /catalog/reload          - Re-fetch the catalog
//!
//! # Filters
//! GET  /filters                 - Current criteria
//! POST /filters/category        - { "category": "hoodies" | null }
//! POST /filters/price-range     - { "min": 0, "max": 100 }
//! POST /filters/sizes/toggle    - { "value": "M" }
//! POST /filters/colors/toggle   - { "value": "black" }
//! POST /filters/in-stock        - { "enabled": true }
//! POST /filters/search          - { "query": "mug" }
//! POST /filters/reset           - Restore defaults
//!
//! # Cart
//! GET  /cart                    - Cart contents
//! POST /cart/add                - { productId, variantId }
//! POST /cart/update             - { productId, variantId, quantity }
//! POST /cart/remove             - { productId, variantId }
//! GET  /cart/count              - Cart badge count
//!
//! # Checkout
//! GET  /checkout                - Order summary
//! POST /checkout                - Submit the checkout form
//!
//! # Mock catalog API
//! GET  /api/products            - ?category=&search=
//! GET  /api/products/{id}       - Product or 404
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod filters;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the filter routes router.
pub fn filter_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(filters::show))
        .route("/category", post(filters::set_category))
        .route("/price-range", post(filters::set_price_range))
        .route("/sizes/toggle", post(filters::toggle_size))
        .route("/colors/toggle", post(filters::toggle_color))
        .route("/in-stock", post(filters::set_in_stock))
        .route("/search", post(filters::set_search_query))
        .route("/reset", post(filters::reset))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the mock catalog API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::list_products))
        .route("/products/{id}", get(api::get_product))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/catalog/reload", post(products::reload))
        .nest("/filters", filter_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .nest("/api", api_routes())
}
