//! Cart route handlers.
//!
//! The cart is a single persisted container shared by every request. Line
//! views join the cart with the loaded catalog; lines whose product or
//! variant is unknown are left out of the view but stay in the cart.

use axum::{Json, extract::State};
use language_shop_core::{OrderSummary, Price, ProductId, SummaryLine, VariantId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::add_breadcrumb;
use crate::state::{AppState, SharedCart};

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub name: String,
    pub variant_label: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<SummaryLine> for CartItemView {
    fn from(line: SummaryLine) -> Self {
        Self {
            price: line.unit_price.to_string(),
            line_price: line.line_total.to_string(),
            product_id: line.product_id,
            variant_id: line.variant_id,
            name: line.name,
            variant_label: line.variant_label,
            image: line.image,
            quantity: line.quantity,
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub hydrated: bool,
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: Price,
    pub formatted_subtotal: String,
    pub is_empty: bool,
}

/// Cart badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u64,
}

/// Identifies one line item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    pub variant_id: VariantId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityInput {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: i64,
}

/// Build the cart view. The catalog lock is taken before the cart lock,
/// matching every other handler.
async fn render(state: &AppState, apply: impl FnOnce(&mut SharedCart)) -> Json<CartView> {
    let catalog = state.catalog().read().await;
    let mut cart = state.cart().lock().await;
    apply(&mut cart);

    let summary = OrderSummary::build(cart.items(), catalog.products());
    Json(CartView {
        hydrated: cart.has_hydrated(),
        item_count: cart.total_items(),
        is_empty: cart.is_empty(),
        formatted_subtotal: summary.total.to_string(),
        subtotal: summary.total,
        items: summary.lines.into_iter().map(CartItemView::from).collect(),
    })
}

/// Cart contents.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    render(&state, |_| {}).await
}

/// Add one unit of a variant.
#[instrument(skip(state), fields(product_id = %input.product_id, variant_id = %input.variant_id))]
pub async fn add(State(state): State<AppState>, Json(input): Json<LineKey>) -> Json<CartView> {
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", input.product_id.as_str()),
            ("variant_id", input.variant_id.as_str()),
        ],
    );
    info!("Adding item to cart");

    render(&state, |cart| cart.add_item(input.product_id, input.variant_id)).await
}

/// Set a line's quantity. Quantities below 1 leave the cart unchanged.
#[instrument(skip(state), fields(product_id = %input.product_id, variant_id = %input.variant_id))]
pub async fn update(
    State(state): State<AppState>,
    Json(input): Json<UpdateQuantityInput>,
) -> Json<CartView> {
    render(&state, |cart| {
        cart.update_quantity(&input.product_id, &input.variant_id, input.quantity);
    })
    .await
}

/// Remove a line.
#[instrument(skip(state), fields(product_id = %input.product_id, variant_id = %input.variant_id))]
pub async fn remove(State(state): State<AppState>, Json(input): Json<LineKey>) -> Json<CartView> {
    render(&state, |cart| cart.remove_item(&input.product_id, &input.variant_id)).await
}

/// Total quantity across all lines.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountView> {
    Json(CartCountView {
        count: state.cart().lock().await.total_items(),
    })
}
