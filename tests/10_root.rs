mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn root_returns_service_info() {
    let app = common::test_app();
    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string(), "missing message field: {}", body);
    assert!(body["endpoints"].is_object(), "missing endpoints map: {}", body);
}

#[tokio::test]
async fn health_reports_ok_for_reachable_store() {
    let app = common::test_app();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::test_app();
    let (status, _) = app.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
