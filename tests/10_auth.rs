mod common;

use axum::http::{Method, StatusCode};

#[tokio::test]
async fn health_is_open() {
    let app = common::spawn().await;
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn resource_routes_require_a_user() {
    let app = common::spawn().await;
    let (status, body) = app
        .request(Method::GET, "/api/v1/exercises", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbled_user_header_is_rejected() {
    let app = common::spawn().await;
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/v1/exercises")
        .header("X-User-Id", "not-a-number")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
