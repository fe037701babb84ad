use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::{AppState, ListParams};
use crate::database::models::Enrollment;
use crate::database::EntityStore;
use crate::error::ApiError;
use crate::schemas::{EnrollmentCreate, EnrollmentUpdate};

/// POST /enrollments/ - Enroll a student in a course.
///
/// Precondition chain, each failure short-circuiting the rest: the student
/// must exist, the course must exist, and the (student, course) pair must
/// not be enrolled already.
pub async fn create<S: EntityStore>(
    State(store): State<AppState<S>>,
    Json(payload): Json<EnrollmentCreate>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    info!(
        "Creating enrollment for student {} in course {}",
        payload.student_id, payload.course_id
    );
    payload.validate()?;

    if store.get_student(payload.student_id).await?.is_none() {
        warn!("Student not found: {}", payload.student_id);
        return Err(ApiError::not_found("Student not found"));
    }

    if store.get_course(payload.course_id).await?.is_none() {
        warn!("Course not found: {}", payload.course_id);
        return Err(ApiError::not_found("Course not found"));
    }

    if store
        .find_enrollment_by_pair(payload.student_id, payload.course_id)
        .await?
        .is_some()
    {
        warn!(
            "Student {} already enrolled in course {}",
            payload.student_id, payload.course_id
        );
        return Err(ApiError::conflict("Student already enrolled in this course"));
    }

    // A concurrent duplicate insert surfaces as the same conflict via
    // StoreError::DuplicateEnrollment.
    let enrollment = store.insert_enrollment(&payload).await?;
    info!("Enrollment created successfully with ID: {}", enrollment.id);
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /enrollments/ - List enrollments with pagination
pub async fn list<S: EntityStore>(
    State(store): State<AppState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    info!("Fetching enrollments with skip={}, limit={}", params.skip(), params.limit());
    let enrollments = store.list_enrollments(params.skip(), params.limit()).await?;
    Ok(Json(enrollments))
}

/// GET /enrollments/:id - Get an enrollment by id
pub async fn read<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Enrollment>, ApiError> {
    info!("Fetching enrollment with ID: {}", id);
    match store.get_enrollment(id).await? {
        Some(enrollment) => Ok(Json(enrollment)),
        None => {
            warn!("Enrollment not found with ID: {}", id);
            Err(ApiError::not_found("Enrollment not found"))
        }
    }
}

/// GET /students/:id/enrollments - All enrollments for a student.
/// 404 when the student does not exist; an empty list is a valid answer.
pub async fn by_student<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    info!("Fetching enrollments for student: {}", student_id);
    if store.get_student(student_id).await?.is_none() {
        warn!("Student not found: {}", student_id);
        return Err(ApiError::not_found("Student not found"));
    }
    let enrollments = store.list_enrollments_by_student(student_id).await?;
    info!("Retrieved {} enrollments for student {}", enrollments.len(), student_id);
    Ok(Json(enrollments))
}

/// GET /courses/:id/enrollments - All enrollments for a course.
pub async fn by_course<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(course_id): Path<i64>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    info!("Fetching enrollments for course: {}", course_id);
    if store.get_course(course_id).await?.is_none() {
        warn!("Course not found: {}", course_id);
        return Err(ApiError::not_found("Course not found"));
    }
    let enrollments = store.list_enrollments_by_course(course_id).await?;
    info!("Retrieved {} enrollments for course {}", enrollments.len(), course_id);
    Ok(Json(enrollments))
}

/// PUT /enrollments/:id - Update an enrollment (grade only; the referenced
/// student and course are immutable after creation)
pub async fn update<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(payload): Json<EnrollmentUpdate>,
) -> Result<Json<Enrollment>, ApiError> {
    info!("Updating enrollment with ID: {}", id);
    payload.validate()?;

    match store.update_enrollment(id, &payload).await? {
        Some(enrollment) => {
            info!("Enrollment updated successfully: {}", id);
            Ok(Json(enrollment))
        }
        None => {
            warn!("Enrollment not found for update with ID: {}", id);
            Err(ApiError::not_found("Enrollment not found"))
        }
    }
}

/// DELETE /enrollments/:id - Unenroll a student from a course
pub async fn delete<S: EntityStore>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting enrollment with ID: {}", id);
    if !store.delete_enrollment(id).await? {
        warn!("Enrollment not found for deletion with ID: {}", id);
        return Err(ApiError::not_found("Enrollment not found"));
    }
    info!("Enrollment deleted successfully: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
