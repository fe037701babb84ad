use serde::Deserialize;

use super::{check_length, check_range, finish, reject_null, FieldErrors, Patch};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct CourseCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub credits: i32,
    pub instructor: String,
}

impl CourseCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "title", &self.title, 1, 200);
        if let Some(description) = &self.description {
            check_length(&mut errors, "description", description, 0, 1000);
        }
        check_range(&mut errors, "credits", self.credits, 1, 10);
        check_length(&mut errors, "instructor", &self.instructor, 1, 100);
        finish(errors)
    }
}

/// Partial update. description is nullable, so an explicit null clears it;
/// the remaining fields reject null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub credits: Patch<i32>,
    #[serde(default)]
    pub instructor: Patch<String>,
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        match &self.title {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "title"),
            Patch::Value(title) => check_length(&mut errors, "title", title, 1, 200),
        }
        if let Patch::Value(description) = &self.description {
            check_length(&mut errors, "description", description, 0, 1000);
        }
        match &self.credits {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "credits"),
            Patch::Value(credits) => check_range(&mut errors, "credits", *credits, 1, 10),
        }
        match &self.instructor {
            Patch::Absent => {}
            Patch::Null => reject_null(&mut errors, "instructor"),
            Patch::Value(instructor) => check_length(&mut errors, "instructor", instructor, 1, 100),
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_credits_in_range() {
        let course = CourseCreate {
            title: "Mathematics 101".to_string(),
            description: None,
            credits: 0,
            instructor: "Dr. Smith".to_string(),
        };
        assert!(course.validate().is_err());
    }

    #[test]
    fn update_allows_clearing_description() {
        let patch: CourseUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.description, Patch::Null);
    }
}
