//! HTTP router envelopes and status codes.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use prazo_integration_tests::{API_ROOT, get_json, paid_order, state, with};
use prazo_server::config::{ShopifyConfig, TrackerConfig};
use prazo_server::middleware::REQUEST_ID_HEADER;
use prazo_server::AppState;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_orders(server: &MockServer, orders: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/orders.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": orders })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let response = prazo_server::app(state(&server, false))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_list_envelope() {
    let server = MockServer::start().await;
    mount_orders(
        &server,
        json!([
            paid_order(1, 9),
            with(paid_order(2, 4), json!({"tags": "entregue"}))
        ]),
    )
    .await;

    let (status, body) = get_json(state(&server, false), "/api/orders").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["pagesProcessed"], json!(1));
    assert_eq!(body["stats"]["totalFetched"], json!(2));
    assert_eq!(body["stats"]["deliveredFiltered"], json!(1));
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let order = &body["orders"][0];
    assert_eq!(order["id"], json!(1));
    assert_eq!(order["name"], json!("#1"));
    assert_eq!(order["daysSinceOrder"], json!(9));
    assert_eq!(order["hasTracking"], json!(false));
    assert_eq!(order["urgencyLevel"], json!("critical"));
    assert_eq!(order["prazoStatus"], json!("aguardando_urgente"));
    assert_eq!(order["isLate"], json!(true));
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_list_query_parameters_reach_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/orders.json")))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"orders": []})))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(
        state(&server, false),
        "/api/orders?days=15&maxPages=1&onError=partial",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stop"]["reason"], json!("empty_page"));
}

#[tokio::test]
async fn test_invalid_query_is_bad_request() {
    let server = MockServer::start().await;

    for uri in [
        "/api/orders?maxPages=0",
        "/api/orders?days=0",
        "/api/orders?days=-3",
        "/api/orders?onError=retry",
    ] {
        let (status, body) = get_json(state(&server, false), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("malformed_input"));
    }
}

#[tokio::test]
async fn test_malformed_order_id_is_bad_request() {
    let server = MockServer::start().await;

    let (status, body) = get_json(state(&server, false), "/api/orders/not-a-number").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("malformed_input"));
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/orders/404.json")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, body) = get_json(state(&server, false), "/api/orders/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "error": "not_found", "message": "Not found: order 404"})
    );
}

#[tokio::test]
async fn test_detail_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/orders/31.json")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"order": paid_order(31, 2)})),
        )
        .mount(&server)
        .await;

    let (status, body) = get_json(state(&server, false), "/api/orders/31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["order"]["id"], json!(31));
    assert_eq!(body["order"]["customer"]["ordersCount"], json!(1));
    assert_eq!(body["order"]["trackingNumbers"], json!([]));
    assert!(body.get("warnings").is_none());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway_without_body_leak() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API_ROOT}/orders.json")))
        .respond_with(ResponseTemplate::new(500).set_body_string("secret stack trace"))
        .mount(&server)
        .await;

    let (status, body) = get_json(state(&server, false), "/api/orders").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], json!("fetch_failed"));
    assert_eq!(body["message"], json!("Shopify request failed with status 500"));
    assert!(!body.to_string().contains("secret stack trace"));
}

#[tokio::test]
async fn test_dev_mode_attaches_details() {
    let server = MockServer::start().await;

    let (status, body) = get_json(state(&server, true), "/api/orders/xyz").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_missing_token_is_configuration_error() {
    let server = MockServer::start().await;
    let config = TrackerConfig::new(
        ShopifyConfig::new("test.myshopify.com", None).with_base_url(server.uri()),
    );
    let state = AppState::new(config).unwrap();

    let (status, body) = get_json(state, "/api/orders").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("configuration"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = MockServer::start().await;

    let response = prazo_server::app(state(&server, false))
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/orders")
                .header("Origin", "https://painel.example.com")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
