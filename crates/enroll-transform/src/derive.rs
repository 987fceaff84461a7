//! Derived display fields.

use enroll_model::{Course, JoinedRecord, User};

use crate::join::MatchedEnrollment;

/// Separator between SIS course id and course name in a course label.
pub const LABEL_SEPARATOR: &str = " – ";

pub fn user_full_name(user: &User) -> String {
    format!("{} {}", user.given_name, user.family_name)
}

pub fn course_label(course: &Course) -> String {
    format!("{}{LABEL_SEPARATOR}{}", course.course_id, course.name)
}

/// Owned joined record with its derived fields filled in.
pub fn derive_record(matched: &MatchedEnrollment<'_>) -> JoinedRecord {
    JoinedRecord {
        enrollment: matched.enrollment.clone(),
        user: matched.user.clone(),
        course: matched.course.clone(),
        user_full_name: user_full_name(matched.user),
        course_label: course_label(matched.course),
    }
}

pub fn derive_all(matched: &[MatchedEnrollment<'_>]) -> Vec<JoinedRecord> {
    matched.iter().map(derive_record).collect()
}
