use serde::Deserialize;

use super::{check_email, check_length, check_range, finish, reject_null, FieldErrors, Patch};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentCreate {
    pub name: String,
    pub email: String,
    pub age: i32,
}

impl StudentCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "name", &self.name, 1, 100);
        check_email(&mut errors, &self.email);
        check_range(&mut errors, "age", self.age, 1, 150);
        finish(errors)
    }
}

/// Partial update: only fields present in the request body change. None of
/// the student fields are nullable, so an explicit null is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
}

impl StudentUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        match &self.name {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "name"),
            Patch::Value(name) => check_length(&mut errors, "name", name, 1, 100),
        }
        match &self.email {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "email"),
            Patch::Value(email) => check_email(&mut errors, email),
        }
        match &self.age {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "age"),
            Patch::Value(age) => check_range(&mut errors, "age", *age, 1, 150),
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_bounds_are_inclusive() {
        let ok = StudentCreate {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            age: 150,
        };
        assert!(ok.validate().is_ok());

        let bad = StudentCreate { name: String::new(), email: "invalid-email".to_string(), age: 0 };
        let err = bad.validate().unwrap_err();
        match err {
            ApiError::ValidationError { field_errors, .. } => {
                assert!(field_errors.contains_key("name"));
                assert!(field_errors.contains_key("email"));
                assert!(field_errors.contains_key("age"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn update_rejects_explicit_null() {
        let patch: StudentUpdate = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch: StudentUpdate = serde_json::from_str(r#"{"age": 21}"#).unwrap();
        assert!(patch.validate().is_ok());
    }
}
