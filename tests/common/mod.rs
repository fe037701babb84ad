#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use campus_api::database::MemoryStore;

/// In-process test harness: the full router over a fresh in-memory store.
/// Each test constructs its own app, so tests never share state.
pub struct TestApp {
    router: Router,
}

pub fn test_app() -> TestApp {
    TestApp { router: campus_api::app(Arc::new(MemoryStore::new())) }
}

impl TestApp {
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request("DELETE", path, None).await
    }

    /// Create a student and return its id.
    pub async fn create_student(&self, name: &str, email: &str, age: i64) -> i64 {
        let (status, body) = self
            .post("/students/", json!({ "name": name, "email": email, "age": age }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "student create failed: {}", body);
        body["id"].as_i64().expect("student id")
    }

    /// Create a course and return its id.
    pub async fn create_course(&self, title: &str, credits: i64, instructor: &str) -> i64 {
        let (status, body) = self
            .post(
                "/courses/",
                json!({ "title": title, "credits": credits, "instructor": instructor }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "course create failed: {}", body);
        body["id"].as_i64().expect("course id")
    }

    /// Enroll a student in a course and return the enrollment id.
    pub async fn create_enrollment(&self, student_id: i64, course_id: i64) -> i64 {
        let (status, body) = self
            .post(
                "/enrollments/",
                json!({ "student_id": student_id, "course_id": course_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "enrollment create failed: {}", body);
        body["id"].as_i64().expect("enrollment id")
    }
}
