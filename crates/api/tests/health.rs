mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, build_test_app, get, FakeGateway, FakeReply};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_returns_ok() {
    let app = build_test_app(FakeGateway::new(FakeReply::Payload(json!({}))));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["upstream_configured"], true);
}

#[tokio::test]
async fn test_health_reports_misconfigured_upstream() {
    let gateway = FakeGateway::new(FakeReply::Misconfigured);
    let response = get(build_test_app(gateway.clone()), "/health").await;

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["upstream_configured"], false);
    assert_eq!(gateway.calls(), 0, "health must not call the vision API");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = build_test_app(FakeGateway::new(FakeReply::Payload(json!({}))));
    let response = get(app, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_rejects_get() {
    let app = build_test_app(FakeGateway::new(FakeReply::Payload(json!({}))));
    let response = get(app, "/api/analyze").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = build_test_app(FakeGateway::new(FakeReply::Payload(json!({}))));
    let response = get(app, "/health").await;

    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert_eq!(id.len(), 36, "expected a UUID, got {id}");
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = build_test_app(FakeGateway::new(FakeReply::Payload(json!({}))));
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/analyze")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
