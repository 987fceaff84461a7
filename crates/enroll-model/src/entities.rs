//! Canonical in-memory entities produced by normalization.

use serde::Serialize;

use crate::enums::{Classified, CourseRole, RoleBucket, RoleCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Internal LMS id, the join key for enrollments.
    pub id: String,
    /// SIS-style course id (e.g. `CS101-2025FA`).
    pub course_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Term suffix of the SIS id (`2025FA`), when it has one.
    pub term: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    /// Internal course id, not the SIS id.
    pub course_id: String,
    #[serde(rename = "type")]
    pub category: Classified<RoleCategory>,
    pub role: Classified<CourseRole>,
    pub available: bool,
}

impl Enrollment {
    /// Filter bucket: from the role category, falling back to the functional
    /// role when the category is unrecognized. `None` when neither is known.
    pub fn bucket(&self) -> Option<RoleBucket> {
        self.category.bucket().or_else(|| self.role.bucket())
    }
}

/// One enrollment joined to its user and course, with derived display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedRecord {
    pub enrollment: Enrollment,
    pub user: User,
    pub course: Course,
    /// `given + " " + family`.
    pub user_full_name: String,
    /// `courseId + " – " + name`.
    pub course_label: String,
}

impl JoinedRecord {
    /// Enrollment, user and course are all available.
    pub fn fully_available(&self) -> bool {
        self.enrollment.available && self.user.available && self.course.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Vocabulary;
    use crate::options::MatchingMode;

    fn enrollment(category: &str, role: &str) -> Enrollment {
        Enrollment {
            id: "_e1_1".to_string(),
            user_id: "_u1_1".to_string(),
            course_id: "_c1_1".to_string(),
            category: RoleCategory::classify(category, MatchingMode::Lenient),
            role: CourseRole::classify(role, MatchingMode::Lenient),
            available: true,
        }
    }

    #[test]
    fn bucket_prefers_category() {
        assert_eq!(
            enrollment("Student", "Instructor").bucket(),
            Some(RoleBucket::Student)
        );
    }

    #[test]
    fn bucket_falls_back_to_role() {
        assert_eq!(
            enrollment("SuperType", "TeachingAssistant").bucket(),
            Some(RoleBucket::Instructor)
        );
        assert_eq!(enrollment("SuperType", "SuperRole").bucket(), None);
    }

    #[test]
    fn enrollment_serializes_type_field() {
        let json = serde_json::to_value(enrollment("student", "SuperRole")).unwrap();
        assert_eq!(json["type"], "Student");
        assert_eq!(json["role"], "SuperRole");
    }
}
