//! Filter criteria route handlers.
//!
//! Every mutation replaces one field and answers with the full criteria.

use axum::{Json, extract::State};
use language_shop_core::{Category, FilterCriteria, PriceRange};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleInput {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct InStockInput {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub query: String,
}

/// Apply `f` to the shared criteria and return the result.
async fn update(state: &AppState, f: impl FnOnce(&mut FilterCriteria)) -> Json<FilterCriteria> {
    let mut criteria = state.filters().write().await;
    f(&mut criteria);
    debug!(criteria = ?*criteria, "Filters updated");
    Json(criteria.clone())
}

/// Current criteria.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<FilterCriteria> {
    Json(state.filters().read().await.clone())
}

#[instrument(skip(state))]
pub async fn set_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.set_category(input.category)).await
}

/// Price bounds are stored as given, even when `min > max`.
#[instrument(skip(state))]
pub async fn set_price_range(
    State(state): State<AppState>,
    Json(range): Json<PriceRange>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.set_price_range(range)).await
}

#[instrument(skip(state))]
pub async fn toggle_size(
    State(state): State<AppState>,
    Json(input): Json<ToggleInput>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.toggle_size(input.value)).await
}

#[instrument(skip(state))]
pub async fn toggle_color(
    State(state): State<AppState>,
    Json(input): Json<ToggleInput>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.toggle_color(input.value)).await
}

#[instrument(skip(state))]
pub async fn set_in_stock(
    State(state): State<AppState>,
    Json(input): Json<InStockInput>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.set_in_stock(input.enabled)).await
}

#[instrument(skip(state))]
pub async fn set_search_query(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> Json<FilterCriteria> {
    update(&state, |c| c.set_search_query(input.query)).await
}

#[instrument(skip(state))]
pub async fn reset(State(state): State<AppState>) -> Json<FilterCriteria> {
    update(&state, FilterCriteria::reset_filters).await
}
