pub mod courses;
pub mod enrollments;
pub mod students;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::EntityStore;

pub type AppState<S> = Arc<S>;

/// Offset/limit pagination for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100)
    }
}

/// GET / - Service info
pub async fn root() -> Json<Value> {
    tracing::info!("Root endpoint accessed");
    Json(json!({
        "name": "Campus API",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to Student Course Management API",
        "endpoints": {
            "students": "/students/[:id]",
            "courses": "/courses/[:id]",
            "enrollments": "/enrollments/[:id]",
            "student_enrollments": "/students/:id/enrollments",
            "course_enrollments": "/courses/:id/enrollments",
            "health": "/health",
        }
    }))
}

/// GET /health - Store connectivity probe
pub async fn health<S: EntityStore>(
    State(store): State<AppState<S>>,
) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();
    match store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
