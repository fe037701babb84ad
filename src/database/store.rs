use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Course, Enrollment, Student};
use crate::schemas::{
    CourseCreate, CourseUpdate, EnrollmentCreate, EnrollmentUpdate, StudentCreate, StudentUpdate,
};

/// Errors surfaced by store implementations. Uniqueness violations get their
/// own variants so a write-time constraint failure can be reported to the
/// client exactly like the handler's pre-check would have been.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("student already enrolled in this course")]
    DuplicateEnrollment,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence operations for the three entities. Handlers receive an
/// `Arc<impl EntityStore>` as router state; every call is atomic - a failed
/// mutation leaves nothing behind for subsequent reads to observe.
///
/// Inserts assign the id and timestamps. Updates apply only the set fields
/// of the patch and refresh updated_at (enrollments have no updated_at).
/// Listing is in insertion order with offset/limit applied.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    // Students
    async fn insert_student(&self, new: &StudentCreate) -> Result<Student, StoreError>;
    async fn get_student(&self, id: i64) -> Result<Option<Student>, StoreError>;
    async fn list_students(&self, skip: i64, limit: i64) -> Result<Vec<Student>, StoreError>;
    async fn update_student(
        &self,
        id: i64,
        changes: &StudentUpdate,
    ) -> Result<Option<Student>, StoreError>;
    async fn delete_student(&self, id: i64) -> Result<bool, StoreError>;
    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError>;

    // Courses
    async fn insert_course(&self, new: &CourseCreate) -> Result<Course, StoreError>;
    async fn get_course(&self, id: i64) -> Result<Option<Course>, StoreError>;
    async fn list_courses(&self, skip: i64, limit: i64) -> Result<Vec<Course>, StoreError>;
    async fn update_course(
        &self,
        id: i64,
        changes: &CourseUpdate,
    ) -> Result<Option<Course>, StoreError>;
    async fn delete_course(&self, id: i64) -> Result<bool, StoreError>;

    // Enrollments
    async fn insert_enrollment(&self, new: &EnrollmentCreate) -> Result<Enrollment, StoreError>;
    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>, StoreError>;
    async fn list_enrollments(&self, skip: i64, limit: i64) -> Result<Vec<Enrollment>, StoreError>;
    async fn update_enrollment(
        &self,
        id: i64,
        changes: &EnrollmentUpdate,
    ) -> Result<Option<Enrollment>, StoreError>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool, StoreError>;
    async fn find_enrollment_by_pair(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError>;
    async fn list_enrollments_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError>;
    async fn list_enrollments_by_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError>;
}
