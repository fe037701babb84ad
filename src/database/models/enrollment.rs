use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Links a student to a course by id. The references are non-owning: deleting
/// a student or course leaves its enrollments in place, so student_id and
/// course_id may point at rows that no longer exist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade: Option<String>,
    pub enrollment_date: DateTime<Utc>,
}
