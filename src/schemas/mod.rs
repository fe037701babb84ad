// Request schemas for create/update operations. Validation runs before any
// store access and reports every violated field rule at once.

pub mod course;
pub mod enrollment;
pub mod student;

pub use course::{CourseCreate, CourseUpdate};
pub use enrollment::{EnrollmentCreate, EnrollmentUpdate};
pub use student::{StudentCreate, StudentUpdate};

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::error::ApiError;

pub type FieldErrors = HashMap<String, String>;

/// Tri-state update field. A field missing from the request body is Absent
/// and leaves the stored value untouched; an explicit JSON null is Null,
/// which clears a nullable field and is a validation error on a required one.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

// Requires #[serde(default)] on the field so that a missing key stays Absent.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Syntactic email check: one '@' separating a non-empty local part from a
/// dotted, non-empty domain, with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) => (l, d),
        _ => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}

pub(crate) fn check_length(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.insert(
            field.to_string(),
            format!("length must be between {} and {} characters", min, max),
        );
    }
}

pub(crate) fn check_range(errors: &mut FieldErrors, field: &str, value: i32, min: i32, max: i32) {
    if value < min || value > max {
        errors.insert(field.to_string(), format!("must be between {} and {}", min, max));
    }
}

pub(crate) fn check_email(errors: &mut FieldErrors, value: &str) {
    if !is_valid_email(value) {
        errors.insert("email".to_string(), "value is not a valid email address".to_string());
    }
}

pub(crate) fn reject_null(errors: &mut FieldErrors, field: &str) {
    errors.insert(field.to_string(), "field may not be null".to_string());
}

pub(crate) fn finish(errors: FieldErrors) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid input", errors))
    }
}
