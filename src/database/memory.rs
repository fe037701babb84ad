use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::{Course, Enrollment, Student};
use crate::database::store::{EntityStore, StoreError};
use crate::schemas::{
    CourseCreate, CourseUpdate, EnrollmentCreate, EnrollmentUpdate, Patch, StudentCreate,
    StudentUpdate,
};

#[derive(Debug, Default)]
struct Tables {
    students: BTreeMap<i64, Student>,
    courses: BTreeMap<i64, Course>,
    enrollments: BTreeMap<i64, Enrollment>,
    next_student_id: i64,
    next_course_id: i64,
    next_enrollment_id: i64,
}

/// In-memory store for local development and tests. Ids ascend from 1 per
/// entity, so iterating the BTreeMaps yields insertion order. All mutations
/// run under a single write lock, which makes each call atomic and lets
/// uniqueness checks happen in the same critical section as the write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    // ===== Students =====

    async fn insert_student(&self, new: &StudentCreate) -> Result<Student, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.students.values().any(|s| s.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        tables.next_student_id += 1;
        let now = Utc::now();
        let student = Student {
            id: tables.next_student_id,
            name: new.name.clone(),
            email: new.email.clone(),
            age: new.age,
            created_at: now,
            updated_at: now,
        };
        tables.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>, StoreError> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn list_students(&self, skip: i64, limit: i64) -> Result<Vec<Student>, StoreError> {
        let tables = self.tables.read().await;
        Ok(window(tables.students.values().cloned(), skip, limit))
    }

    async fn update_student(
        &self,
        id: i64,
        changes: &StudentUpdate,
    ) -> Result<Option<Student>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Patch::Value(email) = &changes.email {
            if tables.students.values().any(|s| s.id != id && &s.email == email) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let Some(student) = tables.students.get_mut(&id) else {
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
        student.updated_at = Utc::now();
        Ok(Some(student.clone()))
    }

    async fn delete_student(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.students.remove(&id).is_some())
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.students.values().find(|s| s.email == email).cloned())
    }

    // ===== Courses =====

    async fn insert_course(&self, new: &CourseCreate) -> Result<Course, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: tables.next_course_id,
            title: new.title.clone(),
            description: new.description.clone(),
            credits: new.credits,
            instructor: new.instructor.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn list_courses(&self, skip: i64, limit: i64) -> Result<Vec<Course>, StoreError> {
        let tables = self.tables.read().await;
        Ok(window(tables.courses.values().cloned(), skip, limit))
    }

    async fn update_course(
        &self,
        id: i64,
        changes: &CourseUpdate,
    ) -> Result<Option<Course>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(course) = tables.courses.get_mut(&id) else {
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
        course.updated_at = Utc::now();
        Ok(Some(course.clone()))
    }

    async fn delete_course(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.courses.remove(&id).is_some())
    }

    // ===== Enrollments =====

    async fn insert_enrollment(&self, new: &EnrollmentCreate) -> Result<Enrollment, StoreError> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .enrollments
            .values()
            .any(|e| e.student_id == new.student_id && e.course_id == new.course_id);
        if duplicate {
            return Err(StoreError::DuplicateEnrollment);
        }
        tables.next_enrollment_id += 1;
        let enrollment = Enrollment {
            id: tables.next_enrollment_id,
            student_id: new.student_id,
            course_id: new.course_id,
            grade: new.grade.clone(),
            enrollment_date: Utc::now(),
        };
        tables.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }

    async fn get_enrollment(&self, id: i64) -> Result<Option<Enrollment>, StoreError> {
        Ok(self.tables.read().await.enrollments.get(&id).cloned())
    }

    async fn list_enrollments(&self, skip: i64, limit: i64) -> Result<Vec<Enrollment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(window(tables.enrollments.values().cloned(), skip, limit))
    }

    async fn update_enrollment(
        &self,
        id: i64,
        changes: &EnrollmentUpdate,
    ) -> Result<Option<Enrollment>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(enrollment) = tables.enrollments.get_mut(&id) else {
            return Ok(None);
        };
        match &changes.grade {
            Patch::Absent => {}
            Patch::Null => enrollment.grade = None,
            Patch::Value(grade) => enrollment.grade = Some(grade.clone()),
        }
        Ok(Some(enrollment.clone()))
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.enrollments.remove(&id).is_some())
    }

    async fn find_enrollment_by_pair(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_enrollments_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_enrollments_by_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, email: &str, age: i32) -> StudentCreate {
        StudentCreate { name: name.to_string(), email: email.to_string(), age }
    }

    #[tokio::test]
    async fn assigns_ascending_ids_and_lists_in_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_student(&student(&format!("Student {}", i), &format!("s{}@example.com", i), 20))
                .await
                .unwrap();
        }
        let page = store.list_students(2, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, 3);
        assert_eq!(page[1].id, 4);
    }

    #[tokio::test]
    async fn rejects_duplicate_email_at_write_time() {
        let store = MemoryStore::new();
        store.insert_student(&student("John", "john@example.com", 20)).await.unwrap();
        let err = store.insert_student(&student("Jane", "john@example.com", 22)).await;
        assert!(matches!(err, Err(StoreError::DuplicateEmail)));
        // the failed insert left nothing behind
        assert_eq!(store.list_students(0, 100).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_applies_only_set_fields() {
        let store = MemoryStore::new();
        let created = store.insert_student(&student("John Doe", "john@example.com", 20)).await.unwrap();

        let changes = StudentUpdate {
            name: Patch::Value("John Updated".to_string()),
            age: Patch::Value(21),
            ..Default::default()
        };
        let updated = store.update_student(created.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "John Updated");
        assert_eq!(updated.age, 21);
        assert_eq!(updated.email, "john@example.com");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn deleting_a_student_keeps_its_enrollments() {
        let store = MemoryStore::new();
        let s = store.insert_student(&student("John", "john@example.com", 20)).await.unwrap();
        let c = store
            .insert_course(&CourseCreate {
                title: "Math".to_string(),
                description: None,
                credits: 3,
                instructor: "Dr. Smith".to_string(),
            })
            .await
            .unwrap();
        store
            .insert_enrollment(&EnrollmentCreate { student_id: s.id, course_id: c.id, grade: None })
            .await
            .unwrap();

        assert!(store.delete_student(s.id).await.unwrap());
        // orphaned reference is permitted
        let orphans = store.list_enrollments_by_student(s.id).await.unwrap();
        assert_eq!(orphans.len(), 1);
    }
}
