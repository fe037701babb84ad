use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::{AppState, ListParams};
use crate::database::models::Course;
use crate::database::EntityStore;
use crate::error::ApiError;
use crate::schemas::{CourseCreate, CourseUpdate};

/// POST /courses/ - Create a new course. No uniqueness constraint on
/// title or instructor.
pub async fn create<S: EntityStore>(
    State(store): State<AppState<S>>,
    Json(payload): Json<CourseCreate>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    info!("Creating course: {}", payload.title);
    payload.validate()?;

    let course = store.insert_course(&payload).await?;
    info!("Course created successfully with ID: {}", course.id);
    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /courses/ - List courses with pagination
pub async fn list<S: EntityStore>(
    State(store): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Course>>, ApiError> {
    info!("Fetching courses with skip={}, limit={}", params.skip(), params.limit());
    let courses = store.list_courses(params.skip(), params.limit()).await?;
    Ok(Json(courses))
}

/// GET /courses/:id - Get a course by id
pub async fn read<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, ApiError> {
    info!("Fetching course with ID: {}", id);
    match store.get_course(id).await? {
        Some(course) => Ok(Json(course)),
        None => {
            warn!("Course not found with ID: {}", id);
            Err(ApiError::not_found("Course not found"))
        }
    }
}

/// PUT /courses/:id - Partial update; only supplied fields change
pub async fn update<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<CourseUpdate>,
) -> Result<Json<Course>, ApiError> {
    info!("Updating course with ID: {}", id);
    payload.validate()?;

    match store.update_course(id, &payload).await? {
        Some(course) => {
            info!("Course updated successfully: {}", course.id);
            Ok(Json(course))
        }
        None => {
            warn!("Course not found for update with ID: {}", id);
            Err(ApiError::not_found("Course not found"))
        }
    }
}

/// DELETE /courses/:id - Delete unconditionally; enrollments are left behind
pub async fn delete<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting course with ID: {}", id);
    if !store.delete_course(id).await? {
        warn!("Course not found for deletion with ID: {}", id);
        return Err(ApiError::not_found("Course not found"));
    }
    info!("Course deleted successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
