use serde::Deserialize;

use super::{check_length, finish, FieldErrors, Patch};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentCreate {
    pub student_id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub grade: Option<String>,
}

impl EnrollmentCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Some(grade) = &self.grade {
            check_length(&mut errors, "grade", grade, 0, 2);
        }
        finish(errors)
    }
}

/// student_id and course_id are immutable after creation; only the grade can
/// change. grade is nullable, so an explicit null clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentUpdate {
    #[serde(default)]
    pub grade: Patch<String>,
}

impl EnrollmentUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        if let Patch::Value(grade) = &self.grade {
            check_length(&mut errors, "grade", grade, 0, 2);
        }
        finish(errors)
    }
}
