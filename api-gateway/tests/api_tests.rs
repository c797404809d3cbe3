use std::sync::Arc;

use api_gateway::{router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use quotation_service::{QuotationService, QuotationServiceConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing::Level;

fn create_test_app() -> Router {
    let config = QuotationServiceConfig::new(dec!(1.00), dec!(25.00), dec!(5.00), false, 0);
    let state = Arc::new(AppState {
        quotation_service: Arc::new(QuotationService::with_config(config)),
    });
    router(state, Level::DEBUG)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn decimal_field(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_quotation_editing_flow() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/api/v1/quotations", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["can_add_line"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", &format!("/api/v1/quotations/{}/lines", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["can_add_line"], false);

    let line_uri = format!("/api/v1/quotations/{}/lines/0", id);
    send(&app, "PATCH", &line_uri, Some(json!({"field": "vendor_id", "value": "VND-9"}))).await;
    send(&app, "PATCH", &line_uri, Some(json!({"field": "buy_rate", "value": 250}))).await;
    let (status, body) = send(&app, "PATCH", &line_uri, Some(json!({"field": "quantity", "value": "4"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["can_add_line"], true);

    let outcome = &body["data"]["lines"][0]["outcome"];
    assert_eq!(outcome["state"], "priced");

    let (status, body) = send(&app, "GET", &format!("/api/v1/quotations/{}/summary", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current"]["cost"], "1000.00");
    assert_eq!(body["data"]["current"]["markup"], "250.00");
    assert_eq!(body["data"]["current"]["sale"], "1312.50");
    assert_eq!(body["data"]["pending"]["sale"], "0.00");

    let defaults_uri = format!("/api/v1/quotations/{}/defaults", id);
    let (status, body) = send(
        &app,
        "PATCH",
        &defaults_uri,
        Some(json!({"field": "round_up_rate_to_client", "value": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["current"]["sale"], "1313.00");

    let (status, body) = send(&app, "GET", &format!("/api/v1/quotations/{}/lines", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", &format!("/api/v1/quotations/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["lines"][0]["line"]["vendor_id"], "VND-9");

    let (status, body) = send(&app, "GET", &format!("/api/v1/quotations/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_zero_roe_line_is_reported() {
    let app = create_test_app();
    let (_, body) = send(&app, "POST", "/api/v1/quotations", Some(json!({}))).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    send(&app, "POST", &format!("/api/v1/quotations/{}/lines", id), None).await;

    let line_uri = format!("/api/v1/quotations/{}/lines/0", id);
    send(&app, "PATCH", &line_uri, Some(json!({"field": "cost_sum", "value": "100"}))).await;
    let (status, body) = send(&app, "PATCH", &line_uri, Some(json!({"field": "roe", "value": 0}))).await;

    assert_eq!(status, StatusCode::OK);
    let outcome = &body["data"]["lines"][0]["outcome"];
    assert_eq!(outcome["state"], "invalid");
    assert_eq!(outcome["issue"], "zero_exchange_rate");
    assert_eq!(body["data"]["summary"]["current"]["skipped_lines"], 1);
    assert_eq!(body["data"]["summary"]["current"]["cost"], "0.00");
}

#[tokio::test]
async fn test_missing_line_and_quotation() {
    let app = create_test_app();
    let (_, body) = send(&app, "POST", "/api/v1/quotations", Some(json!({}))).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/api/v1/quotations/{}/lines/5", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "line_not_found");

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/api/v1/quotations/{}/summary", unknown), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "quotation_not_found");
}

#[tokio::test]
async fn test_stateless_line_pricing() {
    let app = create_test_app();
    let request = json!({
        "line": { "cost_sum": "1000", "roe": "1.00", "mu_percent": "25" },
        "defaults": { "usd_roe": "1.00", "general_mu": "25", "caf": "5", "round_up_rate_to_client": false }
    });

    let (status, body) = send(&app, "POST", "/api/v1/pricing/line", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "priced");
    assert_eq!(decimal_field(&body["data"]["rate_to_client"]), dec!(1312.50));
    assert_eq!(decimal_field(&body["data"]["qt_rate"]), dec!(1250));
}

#[tokio::test]
async fn test_pricing_derives_missing_cost_sum() {
    let app = create_test_app();
    let request = json!({
        "line": { "quantity": "2", "buy_rate": "500" }
    });

    let (status, body) = send(&app, "POST", "/api/v1/pricing/line", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "priced");
    assert_eq!(decimal_field(&body["data"]["cost_sum"]), dec!(1000));
    assert_eq!(decimal_field(&body["data"]["rate_to_client"]), dec!(1312.50));
}
