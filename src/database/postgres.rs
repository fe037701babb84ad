use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

use crate::database::models::{Course, Enrollment, Student};
use crate::database::store::{EntityStore, StoreError};
use crate::schemas::{
    CourseCreate, CourseUpdate, EnrollmentCreate, EnrollmentUpdate, Patch, StudentCreate,
    StudentUpdate,
};

const STUDENT_COLUMNS: &str = "id, name, email, age, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, title, description, credits, instructor, created_at, updated_at";
const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, grade, enrollment_date";

/// PostgreSQL-backed store. The schema enforces uniqueness (email, the
/// enrollment pair) but deliberately carries no foreign keys on enrollments:
/// deletes are unconditional and orphaned references stay behind.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let db = &crate::config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the tables and unique indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                age INTEGER NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT students_email_key UNIQUE (email)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS courses (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                credits INTEGER NOT NULL,
                instructor TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS enrollments (
                id BIGSERIAL PRIMARY KEY,
                student_id BIGINT NOT NULL,
                course_id BIGINT NOT NULL,
                grade TEXT,
                enrollment_date TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT enrollments_student_course_key UNIQUE (student_id, course_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ready");
        Ok(())
    }
}

/// Translate unique-constraint violations into typed store errors so races
/// between the handler pre-check and the insert surface as the same client
/// error the pre-check produces.
fn map_db_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("students_email_key") => StoreError::DuplicateEmail,
                Some("enrollments_student_course_key") => StoreError::DuplicateEnrollment,
                _ => StoreError::Sqlx(err),
            };
        }
    }
    StoreError::Sqlx(err)
}

#[async_trait]
impl EntityStore for PostgresStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ===== Students =====

    async fn insert_student(&self, new: &StudentCreate) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (name, email, age) VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(new.age)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    async fn list_students(&self, skip: i64, limit: i64) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students ORDER BY id OFFSET $1 LIMIT $2",
            STUDENT_COLUMNS
        ))
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    async fn update_student(
        &self,
        id: i64,
        changes: &StudentUpdate,
    ) -> Result<Option<Student>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1 FOR UPDATE",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut student) = existing else {
            return Ok(None);
        };

        if let Patch::Value(name) = &changes.name {
            student.name = name.clone();
        }
        if let Patch::Value(email) = &changes.email {
            student.email = email.clone();
        }
        if let Patch::Value(age) = &changes.age {
            student.age = *age;
        }

        let updated = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET name = $1, email = $2, age = $3, updated_at = now() \
             WHERE id = $4 RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.age)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_err)?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_student(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE email = $1",
            STUDENT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    // ===== Courses =====

    async fn insert_course(&self, new: &CourseCreate) -> Result<Course, StoreError> {
        sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description, credits, instructor) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.credits)
        .bind(&new.instructor)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    async fn list_courses(&self, skip: i64, limit: i64) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses ORDER BY id OFFSET $1 LIMIT $2",
            COURSE_COLUMNS
        ))
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    async fn update_course(
        &self,
        id: i64,
        changes: &CourseUpdate,
    ) -> Result<Option<Course>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1 FOR UPDATE",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut course) = existing else {
            return Ok(None);
        };

        if let Patch::Value(title) = &changes.title {
            course.title = title.clone();
        }
        match &changes.description {
            Patch::Absent => {}
            Patch::Null => course.description = None,
            Patch::Value(description) => course.description = Some(description.clone()),
        }
        if let Patch::Value(credits) = &changes.credits {
            course.credits = *credits;
        }
        if let Patch::Value(instructor) = &changes.instructor {
            course.instructor = instructor.clone();
        }

        let updated = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET title = $1, description = $2, credits = $3, instructor = $4, \
             updated_at = now() WHERE id = $5 RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.credits)
        .bind(&course.instructor)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_course(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ===== Enrollments =====

    async fn insert_enrollment(&self, new: &EnrollmentCreate) -> Result<Enrollment, StoreError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (student_id, course_id, grade) \
             VALUES ($1, $2, $3) RETURNING {}",
            ENROLLMENT_COLUMNS
        ))
        .bind(new.student_id)
        .bind(new.course_id)
        .bind(&new.grade)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments WHERE id = $1",
            ENROLLMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }

    async fn list_enrollments(&self, skip: i64, limit: i64) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments ORDER BY id OFFSET $1 LIMIT $2",
            ENROLLMENT_COLUMNS
        ))
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;
        Ok(enrollments)
    }

    async fn update_enrollment(
        &self,
        id: i64,
        changes: &EnrollmentUpdate,
    ) -> Result<Option<Enrollment>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments WHERE id = $1 FOR UPDATE",
            ENROLLMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut enrollment) = existing else {
            return Ok(None);
        };

        match &changes.grade {
            Patch::Absent => {}
            Patch::Null => enrollment.grade = None,
            Patch::Value(grade) => enrollment.grade = Some(grade.clone()),
        }

        // no updated_at column on enrollments
        let updated = sqlx::query_as::<_, Enrollment>(&format!(
            "UPDATE enrollments SET grade = $1 WHERE id = $2 RETURNING {}",
            ENROLLMENT_COLUMNS
        ))
        .bind(&enrollment.grade)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_enrollment_by_pair(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments WHERE student_id = $1 AND course_id = $2",
            ENROLLMENT_COLUMNS
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }

    async fn list_enrollments_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments WHERE student_id = $1 ORDER BY id",
            ENROLLMENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(enrollments)
    }

    async fn list_enrollments_by_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {} FROM enrollments WHERE course_id = $1 ORDER BY id",
            ENROLLMENT_COLUMNS
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(enrollments)
    }
}
