//! Integration tests for Prazo Tracker.
//!
//! Every test runs against a [`wiremock`] server standing in for the Shopify
//! Admin REST API, so no credentials or network access are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p prazo-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `orders_listing` - Pagination, failure policy, classification end to end
//! - `order_detail` - Single-order projection and best-effort history
//! - `http_api` - Router envelopes and status codes

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use prazo_server::config::{PipelineConfig, ShopifyConfig, TrackerConfig};
use prazo_server::{AppState, OrdersService};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

/// Access token the mocked store expects.
pub const TEST_TOKEN: &str = "shpat_0f3c9a7d1e5b4c28";

/// Path prefix for the default API version.
pub const API_ROOT: &str = "/admin/api/2024-10";

/// Shopify configuration pointing at the mock server.
#[must_use]
pub fn shopify_config(server: &MockServer) -> ShopifyConfig {
    ShopifyConfig::new("test.myshopify.com", Some(SecretString::from(TEST_TOKEN)))
        .with_base_url(server.uri())
}

/// Service wired to the mock server with default pipeline settings.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn service(server: &MockServer) -> OrdersService {
    OrdersService::new(&shopify_config(server), PipelineConfig::default())
        .expect("service should build")
}

/// Application state wired to the mock server.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn state(server: &MockServer, dev_mode: bool) -> AppState {
    let mut config = TrackerConfig::new(shopify_config(server));
    config.dev_mode = dev_mode;
    AppState::new(config).expect("state should build")
}

/// RFC 3339 timestamp `days` days before now.
#[must_use]
pub fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

/// A paid, unfulfilled order created `age_days` ago.
#[must_use]
pub fn paid_order(id: u64, age_days: i64) -> Value {
    json!({
        "id": id,
        "name": format!("#{id}"),
        "order_number": id,
        "created_at": days_ago(age_days),
        "financial_status": "paid",
        "fulfillment_status": null,
        "currency": "BRL",
        "total_price": "149.90",
        "tags": "",
        "fulfillments": [],
        "line_items": []
    })
}

/// Shallow-merge `overrides` into `base`.
///
/// # Panics
///
/// Panics if either value is not a JSON object.
#[must_use]
pub fn with(mut base: Value, overrides: Value) -> Value {
    let target = base.as_object_mut().expect("base must be an object");
    for (key, value) in overrides.as_object().expect("overrides must be an object") {
        target.insert(key.clone(), value.clone());
    }
    base
}

/// Send a GET through the router and decode the JSON body.
///
/// # Panics
///
/// Panics if the request fails or the body is not JSON.
pub async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = prazo_server::app(state)
        .oneshot(
            Request::get(uri)
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router should respond");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
