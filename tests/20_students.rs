mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_student_returns_201_with_assigned_fields() {
    let app = common::test_app();
    let (status, body) = app
        .post("/students/", json!({ "name": "John Doe", "email": "john@example.com", "age": 20 }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["email"], "john@example.com");
    assert_eq!(body["age"], 20);
    assert!(body["id"].is_number(), "missing id: {}", body);
    assert!(body["created_at"].is_string(), "missing created_at: {}", body);
    assert!(body["updated_at"].is_string(), "missing updated_at: {}", body);
}

#[tokio::test]
async fn distinct_emails_get_distinct_ids_and_round_trip() {
    let app = common::test_app();
    let first = app.create_student("John Doe", "john@example.com", 20).await;
    let second = app.create_student("Jane Smith", "jane@example.com", 22).await;
    assert_ne!(first, second);

    let (status, body) = app.get(&format!("/students/{}", second)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@example.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected_with_400() {
    let app = common::test_app();
    app.create_student("John Doe", "john@example.com", 20).await;

    let (status, body) = app
        .post("/students/", json!({ "name": "Jane Doe", "email": "john@example.com", "age": 22 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap_or_default().to_lowercase();
    assert!(message.contains("already registered"), "unexpected message: {}", body);
}

#[tokio::test]
async fn invalid_fields_are_rejected_with_422_and_no_store_mutation() {
    let app = common::test_app();

    let (status, _) = app
        .post("/students/", json!({ "name": "John Doe", "email": "invalid-email", "age": 20 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .post("/students/", json!({ "name": "John Doe", "email": "john@example.com", "age": 0 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["age"].is_string(), "missing field detail: {}", body);

    // nothing was written
    let (status, body) = app.get("/students/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn age_bounds_are_inclusive() {
    let app = common::test_app();

    let (status, _) = app
        .post("/students/", json!({ "name": "Old Timer", "email": "old@example.com", "age": 150 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post("/students/", json!({ "name": "Too Old", "email": "older@example.com", "age": 151 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn list_honors_skip_and_limit_in_creation_order() {
    let app = common::test_app();
    for i in 0..5 {
        app.create_student(
            &format!("Student {}", i),
            &format!("student{}@example.com", i),
            20 + i,
        )
        .await;
    }

    let (status, body) = app.get("/students/?skip=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["email"], "student2@example.com");
    assert_eq!(items[1]["email"], "student3@example.com");
}

#[tokio::test]
async fn get_missing_student_is_404() {
    let app = common::test_app();
    let (status, body) = app.get("/students/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn partial_update_leaves_unsupplied_fields_unchanged() {
    let app = common::test_app();
    let id = app.create_student("John Doe", "john@example.com", 20).await;

    let (status, body) = app
        .put(&format!("/students/{}", id), json!({ "name": "John Updated", "age": 21 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "John Updated");
    assert_eq!(body["age"], 21);
    assert_eq!(body["email"], "john@example.com");
}

#[tokio::test]
async fn update_to_taken_email_is_rejected_with_400() {
    let app = common::test_app();
    app.create_student("John Doe", "john@example.com", 20).await;
    let id = app.create_student("Jane Smith", "jane@example.com", 22).await;

    let (status, _) = app
        .put(&format!("/students/{}", id), json!({ "email": "john@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // re-submitting the current email is not a conflict
    let (status, _) = app
        .put(&format!("/students/{}", id), json!({ "email": "jane@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_with_explicit_null_is_422() {
    let app = common::test_app();
    let id = app.create_student("John Doe", "john@example.com", 20).await;

    let (status, _) = app.put(&format!("/students/{}", id), json!({ "email": null })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_missing_student_is_404() {
    let app = common::test_app();
    let (status, _) = app.put("/students/999", json!({ "name": "Nobody" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = common::test_app();
    let id = app.create_student("John Doe", "john@example.com", 20).await;

    let (status, _) = app.delete(&format!("/students/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/students/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/students/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
