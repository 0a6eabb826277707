//! LanguageShop storefront library.
//!
//! This crate provides the storefront server as a library, allowing it to
//! be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use catalog::{CatalogError, MockCatalog};
use config::StorefrontConfig;
use state::AppState;
use storage::FileStorage;

/// Build application state from configuration.
///
/// Loads the mock catalog (from `catalog_path` or the built-in products)
/// and hydrates the cart from `data_dir`. The catalog store is left empty.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or parsed.
pub fn build_state(config: StorefrontConfig) -> Result<AppState, CatalogError> {
    let mock_catalog = match &config.catalog_path {
        Some(path) => MockCatalog::from_file(path)?,
        None => MockCatalog::builtin()?,
    };
    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));

    Ok(AppState::new(config, mock_catalog, storage))
}

/// Build the storefront router with its middleware stack.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has loaded without
/// error.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let catalog = state.catalog().read().await;
    if catalog.is_loading() || catalog.error().is_some() || catalog.products().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}
