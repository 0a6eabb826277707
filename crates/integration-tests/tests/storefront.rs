//! End-to-end storefront tests over real HTTP.

#![allow(clippy::unwrap_used)]

use language_shop_core::{Category, ProductId};
use language_shop_integration_tests::TestServer;
use language_shop_storefront::catalog::{CatalogClient, CatalogError};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn get(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let response = server.client.get(server.url(path)).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

async fn post(server: &TestServer, path: &str, body: Value) -> (StatusCode, Value) {
    let response = server
        .client
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap_or(Value::Null))
}

// =============================================================================
// Catalog client against the mock API
// =============================================================================

#[tokio::test]
async fn test_client_fetches_wrapped_product_list() {
    let server = TestServer::start().await;
    let client = CatalogClient::new(server.api_url());

    let products = client.fetch_products().await.unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["hoodie-001", "tshirt-001", "mug-001"]);
    assert_eq!(products[2].category, Category::Mugs);
}

#[tokio::test]
async fn test_client_maps_404_to_not_found() {
    let server = TestServer::start().await;
    let client = CatalogClient::new(server.api_url());

    let err = client
        .fetch_product_by_id(&ProductId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(id) if id.as_str() == "missing"));

    let mug = client
        .fetch_product_by_id(&ProductId::new("mug-001"))
        .await
        .unwrap();
    assert_eq!(mug.name, "Ceramic Coffee Mug");
}

#[tokio::test]
async fn test_client_reports_non_success_status() {
    let server = TestServer::start().await;
    let client = CatalogClient::new(server.api_url().join("/nowhere").unwrap());

    let err = client.fetch_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::FetchFailed { status: 404 }));
}

#[tokio::test]
async fn test_storefront_can_load_catalog_from_remote_api() {
    let upstream = TestServer::start().await;
    let api_url = upstream.api_url();
    let server = TestServer::start_with(|config| config.catalog_api_url = Some(api_url)).await;

    let (status, body) = get(&server, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (status, _) = get(&server, "/products/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_catalog_is_reported() {
    let server = TestServer::start_with(|config| {
        config.catalog_api_url = Some("http://127.0.0.1:9/api".parse().unwrap());
    })
    .await;

    let (_, body) = get(&server, "/products").await;
    assert_eq!(body["total"], 0);
    assert!(body["error"].as_str().unwrap().starts_with("HTTP error"));

    let (status, _) = get(&server, "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Filters
// =============================================================================

#[tokio::test]
async fn test_filtered_listing() {
    let server = TestServer::start().await;

    post(&server, "/filters/sizes/toggle", json!({ "value": "M" })).await;
    let (_, body) = get(&server, "/products").await;
    let ids: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["hoodie-001", "tshirt-001"]);

    post(&server, "/filters/price-range", json!({ "min": 20, "max": 30 })).await;
    let (_, body) = get(&server, "/products").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["id"], "tshirt-001");

    post(&server, "/filters/reset", json!({})).await;
    post(&server, "/filters/search", json!({ "query": "speak the world" })).await;
    let (_, body) = get(&server, "/products").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["id"], "mug-001");
}

// =============================================================================
// Cart and checkout
// =============================================================================

#[tokio::test]
async fn test_cart_totals() {
    let server = TestServer::start().await;
    let hoodie = json!({ "productId": "hoodie-001", "variantId": "h001-s-black" });
    let mug = json!({ "productId": "mug-001", "variantId": "m001-one" });

    post(&server, "/cart/add", hoodie.clone()).await;
    post(&server, "/cart/add", hoodie).await;
    let (status, body) = post(&server, "/cart/add", mug).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 3);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][1]["quantity"], 1);

    let (_, count) = get(&server, "/cart/count").await;
    assert_eq!(count["count"], 3);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let server = TestServer::start().await;
    post(
        &server,
        "/cart/add",
        json!({ "productId": "tshirt-001", "variantId": "t001-l-white" }),
    )
    .await;
    assert!(server.data_dir().join("cart-storage.json").exists());

    let server = server.restart().await;
    let (_, body) = get(&server, "/cart").await;
    assert_eq!(body["hydrated"], true);
    assert_eq!(body["itemCount"], 1);
    assert_eq!(body["items"][0]["variantLabel"], "L, white");
}

#[tokio::test]
async fn test_checkout_flow() {
    let server = TestServer::start().await;

    let (status, body) = post(&server, "/checkout", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Your cart is empty");

    post(
        &server,
        "/cart/add",
        json!({ "productId": "mug-001", "variantId": "m001-one" }),
    )
    .await;

    let (status, body) = post(&server, "/checkout", json!({ "email": "a@b.co" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"][0],
        json!({ "field": "name", "message": "Name must be at least 2 characters" })
    );
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);

    let (status, body) = post(
        &server,
        "/checkout",
        json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "address": "1 Compiler Way",
            "city": "Arlington",
            "postalCode": "22201",
            "country": "United States",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order Confirmed!");
    assert_eq!(body["summary"]["total"], 14.99);
    assert!(uuid::Uuid::parse_str(body["orderNumber"].as_str().unwrap()).is_ok());

    let (_, count) = get(&server, "/cart/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await;
    let response = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "it-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "it-123");
    assert!(server.state.cart().lock().await.has_hydrated());
}
