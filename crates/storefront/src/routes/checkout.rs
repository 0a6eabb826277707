//! Checkout route handlers.
//!
//! Submission validates the form, simulates order processing, then clears
//! the cart. No payment is taken and nothing is sent anywhere.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use language_shop_core::{CheckoutForm, OrderSummary, ValidatedCheckout};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Shown when submitting with nothing in the cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Checkout page data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub is_empty: bool,
    pub summary: OrderSummary,
    pub formatted_total: String,
    /// Initial form values.
    pub form: CheckoutForm,
}

/// Returned for a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: Uuid,
    pub placed_at: DateTime<Utc>,
    pub customer: ValidatedCheckout,
    pub summary: OrderSummary,
    pub formatted_total: String,
    pub message: &'static str,
}

/// Order summary for the current cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CheckoutView> {
    let catalog = state.catalog().read().await;
    let cart = state.cart().lock().await;
    let summary = OrderSummary::build(cart.items(), catalog.products());

    Json(CheckoutView {
        is_empty: cart.is_empty(),
        formatted_total: summary.total.to_string(),
        summary,
        form: CheckoutForm::default(),
    })
}

/// Submit the checkout form.
///
/// The cart stays locked while the order is processed, so it cannot change
/// between validation and clearing.
///
/// # Errors
///
/// Returns `BadRequest` for an empty cart and `Validation` listing every
/// failing field.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<OrderConfirmation>> {
    let catalog = state.catalog().read().await;
    let mut cart = state.cart().lock().await;

    if cart.is_empty() {
        return Err(AppError::BadRequest(EMPTY_CART_MESSAGE.to_string()));
    }

    let customer = form.validate()?;
    let summary = OrderSummary::build(cart.items(), catalog.products());
    drop(catalog);

    tokio::time::sleep(state.config().checkout_delay).await;

    let order_number = Uuid::new_v4();
    info!(
        order_number = %order_number,
        email_domain = customer.email.domain(),
        lines = summary.lines.len(),
        total = %summary.total,
        "Mock order placed"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_number", &order_number.to_string())],
    );

    cart.clear_cart();

    Ok(Json(OrderConfirmation {
        order_number,
        placed_at: Utc::now(),
        customer,
        formatted_total: summary.total.to_string(),
        summary,
        message: "Order Confirmed!",
    }))
}
