//! Inner join of enrollments to users and courses.

use std::collections::BTreeMap;

use tracing::debug;

use enroll_model::{
    AuditWarning, Course, DuplicateIdPolicy, Enrollment, EntityKind, JoinSide, User,
};

use crate::audit::AuditCollector;
use crate::error::{Result, TransformError};
use crate::normalize::NormalizedInputs;

/// An entity addressable by its internal id.
pub trait Keyed {
    const KIND: EntityKind;

    fn key(&self) -> &str;
}

impl Keyed for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for User {
    const KIND: EntityKind = EntityKind::User;

    fn key(&self) -> &str {
        &self.id
    }
}

/// Builds an id lookup. Under `LastWins` a repeated id replaces the earlier
/// entry and is recorded as a warning.
pub fn index_by_id<'a, T: Keyed>(
    items: &'a [T],
    policy: DuplicateIdPolicy,
    audit: &mut AuditCollector,
) -> Result<BTreeMap<&'a str, &'a T>> {
    let mut index = BTreeMap::new();
    for item in items {
        if index.insert(item.key(), item).is_some() {
            match policy {
                DuplicateIdPolicy::LastWins => audit.warn(AuditWarning::DuplicateId {
                    entity: T::KIND,
                    id: item.key().to_string(),
                }),
                DuplicateIdPolicy::Reject => {
                    return Err(TransformError::DuplicateId {
                        entity: T::KIND,
                        id: item.key().to_string(),
                    });
                }
            }
        }
    }
    Ok(index)
}

/// An enrollment with both of its references resolved.
#[derive(Debug, Clone, Copy)]
pub struct MatchedEnrollment<'a> {
    pub enrollment: &'a Enrollment,
    pub user: &'a User,
    pub course: &'a Course,
}

/// Joins enrollments on `userId` and internal `courseId`, keeping input order.
///
/// An enrollment missing either side is dropped with one warning naming which
/// side failed.
pub fn join_enrollments<'a>(
    inputs: &'a NormalizedInputs,
    policy: DuplicateIdPolicy,
    audit: &mut AuditCollector,
) -> Result<Vec<MatchedEnrollment<'a>>> {
    let courses = index_by_id(&inputs.courses, policy, audit)?;
    let users = index_by_id(&inputs.users, policy, audit)?;

    let mut matched = Vec::with_capacity(inputs.enrollments.len());
    let mut dropped = 0usize;
    for enrollment in &inputs.enrollments {
        let user = users.get(enrollment.user_id.as_str()).copied();
        let course = courses.get(enrollment.course_id.as_str()).copied();
        let side = match (user, course) {
            (Some(user), Some(course)) => {
                matched.push(MatchedEnrollment {
                    enrollment,
                    user,
                    course,
                });
                continue;
            }
            (None, Some(_)) => JoinSide::User,
            (Some(_), None) => JoinSide::Course,
            (None, None) => JoinSide::Both,
        };
        dropped += 1;
        audit.warn(AuditWarning::UnmatchedEnrollment {
            enrollment_id: enrollment.id.clone(),
            side,
            user_id: enrollment.user_id.clone(),
            course_id: enrollment.course_id.clone(),
        });
    }
    debug!(joined = matched.len(), dropped, "joined enrollments");
    audit.record_join(matched.len(), dropped);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_model::{Classified, WarningCategory};

    fn course(id: &str, name: &str) -> Course {
        Course {
            id: id.to_string(),
            course_id: format!("{name}-2025FA"),
            name: name.to_string(),
            description: None,
            term: Some("2025FA".to_string()),
            available: true,
        }
    }

    fn user(id: &str, given: &str) -> User {
        User {
            id: id.to_string(),
            user_name: given.to_lowercase(),
            given_name: given.to_string(),
            family_name: "Doe".to_string(),
            email: format!("{}@example.edu", given.to_lowercase()),
            available: true,
        }
    }

    fn enrollment(id: &str, user_id: &str, course_id: &str) -> Enrollment {
        Enrollment {
            id: id.to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            category: Classified::Unrecognized("Student".to_string()),
            role: Classified::Unrecognized("Student".to_string()),
            available: true,
        }
    }

    #[test]
    fn test_join_keeps_enrollment_order() {
        let inputs = NormalizedInputs {
            courses: vec![course("_c1_1", "CS101"), course("_c2_1", "CS102")],
            users: vec![user("_u1_1", "Alice"), user("_u2_1", "Bob")],
            enrollments: vec![
                enrollment("_e3_1", "_u2_1", "_c2_1"),
                enrollment("_e1_1", "_u1_1", "_c1_1"),
                enrollment("_e2_1", "_u1_1", "_c2_1"),
            ],
        };
        let mut audit = AuditCollector::new();
        let matched = join_enrollments(&inputs, DuplicateIdPolicy::LastWins, &mut audit).unwrap();
        let ids: Vec<&str> = matched.iter().map(|m| m.enrollment.id.as_str()).collect();
        assert_eq!(ids, vec!["_e3_1", "_e1_1", "_e2_1"]);
        assert_eq!(matched[0].user.given_name, "Bob");
        assert_eq!(matched[2].course.name, "CS102");
    }

    #[test]
    fn test_unmatched_sides() {
        let inputs = NormalizedInputs {
            courses: vec![course("_c1_1", "CS101")],
            users: vec![user("_u1_1", "Alice")],
            enrollments: vec![
                enrollment("_e1_1", "_u9_1", "_c1_1"),
                enrollment("_e2_1", "_u1_1", "_c9_1"),
                enrollment("_e3_1", "_u9_1", "_c9_1"),
                enrollment("_e4_1", "_u1_1", "_c1_1"),
            ],
        };
        let mut audit = AuditCollector::new();
        let matched = join_enrollments(&inputs, DuplicateIdPolicy::LastWins, &mut audit).unwrap();
        assert_eq!(matched.len(), 1);
        let summary = audit.finish(matched.len());
        assert_eq!(summary.joined, 1);
        assert_eq!(summary.dropped, 3);
        assert_eq!(summary.warning_count(WarningCategory::UnmatchedEnrollment), 3);
        assert_eq!(summary.dropped_on(JoinSide::User), 2);
        assert_eq!(summary.dropped_on(JoinSide::Course), 2);
        assert_eq!(summary.dropped_on(JoinSide::Both), 1);
    }

    #[test]
    fn test_duplicate_last_wins() {
        let inputs = NormalizedInputs {
            courses: vec![course("_c1_1", "CS101")],
            users: vec![user("_u1_1", "Alice"), user("_u1_1", "Alicia")],
            enrollments: vec![enrollment("_e1_1", "_u1_1", "_c1_1")],
        };
        let mut audit = AuditCollector::new();
        let matched = join_enrollments(&inputs, DuplicateIdPolicy::LastWins, &mut audit).unwrap();
        assert_eq!(matched[0].user.given_name, "Alicia");
        let summary = audit.finish(1);
        assert_eq!(
            summary.warnings,
            vec![AuditWarning::DuplicateId {
                entity: EntityKind::User,
                id: "_u1_1".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_reject() {
        let inputs = NormalizedInputs {
            courses: vec![course("_c1_1", "CS101"), course("_c1_1", "CS102")],
            users: vec![],
            enrollments: vec![],
        };
        let mut audit = AuditCollector::new();
        let err = join_enrollments(&inputs, DuplicateIdPolicy::Reject, &mut audit).unwrap_err();
        assert_eq!(
            err,
            TransformError::DuplicateId {
                entity: EntityKind::Course,
                id: "_c1_1".to_string(),
            }
        );
    }
}
