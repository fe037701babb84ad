use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::{AppState, ListParams};
use crate::database::models::Student;
use crate::database::EntityStore;
use crate::error::ApiError;
use crate::schemas::{Patch, StudentCreate, StudentUpdate};

/// POST /students/ - Create a new student
pub async fn create<S: EntityStore>(
    State(store): State<AppState<S>>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    info!("Creating student with email: {}", payload.email);
    payload.validate()?;

    if store.find_student_by_email(&payload.email).await?.is_some() {
        warn!("Attempted to create student with existing email: {}", payload.email);
        return Err(ApiError::conflict("Email already registered"));
    }

    // The store still enforces uniqueness; a race here comes back as the
    // same conflict via StoreError::DuplicateEmail.
    let student = store.insert_student(&payload).await?;
    info!("Student created successfully with ID: {}", student.id);
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /students/ - List students with pagination
pub async fn list<S: EntityStore>(
    State(store): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
    info!("Fetching students with skip={}, limit={}", params.skip(), params.limit());
    let students = store.list_students(params.skip(), params.limit()).await?;
    Ok(Json(students))
}

/// GET /students/:id - Get a student by id
pub async fn read<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Student>, ApiError> {
    info!("Fetching student with ID: {}", id);
    match store.get_student(id).await? {
        Some(student) => Ok(Json(student)),
        None => {
            warn!("Student not found with ID: {}", id);
            Err(ApiError::not_found("Student not found"))
        }
    }
}

/// PUT /students/:id - Partial update; only supplied fields change
pub async fn update<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<StudentUpdate>,
) -> Result<Json<Student>, ApiError> {
    info!("Updating student with ID: {}", id);
    payload.validate()?;

    let Some(existing) = store.get_student(id).await? else {
        warn!("Student not found for update with ID: {}", id);
        return Err(ApiError::not_found("Student not found"));
    };

    // Re-run the create-time uniqueness check when the email actually changes
    if let Patch::Value(email) = &payload.email {
        if email != &existing.email && store.find_student_by_email(email).await?.is_some() {
            warn!("Attempted to update with existing email: {}", email);
            return Err(ApiError::conflict("Email already registered"));
        }
    }

    match store.update_student(id, &payload).await? {
        Some(student) => {
            info!("Student updated successfully: {}", student.id);
            Ok(Json(student))
        }
        None => Err(ApiError::not_found("Student not found")),
    }
}

/// DELETE /students/:id - Delete unconditionally; enrollments are left behind
pub async fn delete<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting student with ID: {}", id);
    if !store.delete_student(id).await? {
        warn!("Student not found for deletion with ID: {}", id);
        return Err(ApiError::not_found("Student not found"));
    }
    info!("Student deleted successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
