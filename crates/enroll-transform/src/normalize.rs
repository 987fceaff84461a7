//! Normalization of validated records into canonical entities.

use enroll_model::{
    AuditWarning, Classified, Course, CourseRecord, CourseRole, Enrollment, EnrollmentRecord,
    NormalizationOptions, RoleCategory, User, UserRecord, Vocabulary,
};

use crate::audit::AuditCollector;

/// Term suffix of a SIS course id: the text after the last `-`.
///
/// `CS101-2025FA` has term `2025FA`; `MATH201` has none.
pub fn derive_term(course_id: &str) -> Option<String> {
    course_id
        .rsplit_once('-')
        .map(|(_, term)| term.trim())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

pub fn normalize_course(record: CourseRecord) -> Course {
    Course {
        term: derive_term(&record.course_id),
        id: record.id,
        course_id: record.course_id,
        name: record.name,
        description: record.description,
        available: record.availability.is_yes(),
    }
}

pub fn normalize_user(record: UserRecord) -> User {
    User {
        id: record.id,
        user_name: record.user_name,
        given_name: record.name.given,
        family_name: record.name.family,
        email: record.contact.email,
        available: record.availability.is_yes(),
    }
}

/// Classifies `type` and `role`. Unrecognized values are kept verbatim and
/// recorded as warnings; they never fail the run.
pub fn normalize_enrollment(
    record: EnrollmentRecord,
    options: &NormalizationOptions,
    audit: &mut AuditCollector,
) -> Enrollment {
    let category = RoleCategory::classify(&record.enrollment_type, options.matching);
    if let Classified::Unrecognized(value) = &category {
        audit.warn(AuditWarning::UnknownType {
            enrollment_id: record.id.clone(),
            value: value.clone(),
        });
    }
    let role = CourseRole::classify(&record.role, options.matching);
    if let Classified::Unrecognized(value) = &role {
        audit.warn(AuditWarning::UnknownRole {
            enrollment_id: record.id.clone(),
            value: value.clone(),
        });
    }
    Enrollment {
        id: record.id,
        user_id: record.user_id,
        course_id: record.course_id,
        category,
        role,
        available: record.available,
    }
}

/// Normalized collections of one run, in input order.
#[derive(Debug, Clone, Default)]
pub struct NormalizedInputs {
    pub courses: Vec<Course>,
    pub users: Vec<User>,
    pub enrollments: Vec<Enrollment>,
}

pub fn normalize_all(
    courses: Vec<CourseRecord>,
    users: Vec<UserRecord>,
    enrollments: Vec<EnrollmentRecord>,
    options: &NormalizationOptions,
    audit: &mut AuditCollector,
) -> NormalizedInputs {
    NormalizedInputs {
        courses: courses.into_iter().map(normalize_course).collect(),
        users: users.into_iter().map(normalize_user).collect(),
        enrollments: enrollments
            .into_iter()
            .map(|record| normalize_enrollment(record, options, audit))
            .collect(),
    }
}
