//! Audit summary: counts and tolerated anomalies of one pipeline run.
//!
//! Hard failures never appear here; they abort the run instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    UnknownType,
    UnknownRole,
    UnmatchedEnrollment,
    DuplicateId,
}

impl WarningCategory {
    pub const ALL: [WarningCategory; 4] = [
        WarningCategory::UnknownType,
        WarningCategory::UnknownRole,
        WarningCategory::UnmatchedEnrollment,
        WarningCategory::DuplicateId,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WarningCategory::UnknownType => "unknown_type",
            WarningCategory::UnknownRole => "unknown_role",
            WarningCategory::UnmatchedEnrollment => "unmatched_enrollment",
            WarningCategory::DuplicateId => "duplicate_id",
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which foreign key of an enrollment failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSide {
    User,
    Course,
    Both,
}

impl JoinSide {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinSide::User => "user",
            JoinSide::Course => "course",
            JoinSide::Both => "user and course",
        }
    }

    /// Whether a failure on `self` includes a failed lookup of `side`.
    /// `Both` involves every side.
    pub fn involves(self, side: JoinSide) -> bool {
        self == side || self == JoinSide::Both
    }
}

/// A tolerated anomaly, with enough context to inspect after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum AuditWarning {
    UnknownType {
        enrollment_id: String,
        value: String,
    },
    UnknownRole {
        enrollment_id: String,
        value: String,
    },
    UnmatchedEnrollment {
        enrollment_id: String,
        side: JoinSide,
        user_id: String,
        course_id: String,
    },
    DuplicateId {
        entity: EntityKind,
        id: String,
    },
}

impl AuditWarning {
    pub fn category(&self) -> WarningCategory {
        match self {
            AuditWarning::UnknownType { .. } => WarningCategory::UnknownType,
            AuditWarning::UnknownRole { .. } => WarningCategory::UnknownRole,
            AuditWarning::UnmatchedEnrollment { .. } => WarningCategory::UnmatchedEnrollment,
            AuditWarning::DuplicateId { .. } => WarningCategory::DuplicateId,
        }
    }

    /// Id of the record the warning is about.
    pub fn record_id(&self) -> &str {
        match self {
            AuditWarning::UnknownType { enrollment_id, .. }
            | AuditWarning::UnknownRole { enrollment_id, .. }
            | AuditWarning::UnmatchedEnrollment { enrollment_id, .. } => enrollment_id,
            AuditWarning::DuplicateId { id, .. } => id,
        }
    }
}

impl fmt::Display for AuditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditWarning::UnknownType {
                enrollment_id,
                value,
            } => write!(f, "enrollment {enrollment_id}: unknown type {value:?}"),
            AuditWarning::UnknownRole {
                enrollment_id,
                value,
            } => write!(f, "enrollment {enrollment_id}: unknown role {value:?}"),
            AuditWarning::UnmatchedEnrollment {
                enrollment_id,
                side,
                user_id,
                course_id,
            } => write!(
                f,
                "enrollment {enrollment_id}: no matching {} (userId {user_id}, courseId {course_id})",
                side.as_str()
            ),
            AuditWarning::DuplicateId { entity, id } => {
                write!(f, "{entity} {id}: duplicate id, later record wins")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    Role,
    Course,
    Availability,
}

impl FilterStage {
    /// Fixed evaluation order.
    pub const ORDER: [FilterStage; 3] = [
        FilterStage::Role,
        FilterStage::Course,
        FilterStage::Availability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterStage::Role => "role",
            FilterStage::Course => "course",
            FilterStage::Availability => "availability",
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: FilterStage,
    pub before: usize,
    pub after: usize,
}

impl StageCount {
    pub fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

/// Records loaded per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadCounts {
    pub courses: usize,
    pub users: usize,
    pub enrollments: usize,
}

impl LoadCounts {
    pub fn get(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Course => self.courses,
            EntityKind::User => self.users,
            EntityKind::Enrollment => self.enrollments,
        }
    }
}

/// Finalized, read-only record of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub loaded: LoadCounts,
    /// Enrollments that resolved both user and course.
    pub joined: usize,
    /// Enrollments dropped by the inner join.
    pub dropped: usize,
    /// Before/after counts in evaluation order.
    pub filter_stages: Vec<StageCount>,
    /// Records handed to rendering.
    pub emitted: usize,
    pub warning_counts: BTreeMap<WarningCategory, usize>,
    pub warnings: Vec<AuditWarning>,
}

impl AuditSummary {
    pub fn warning_count(&self, category: WarningCategory) -> usize {
        self.warning_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total_warnings(&self) -> usize {
        self.warnings.len()
    }

    pub fn stage(&self, stage: FilterStage) -> Option<&StageCount> {
        self.filter_stages.iter().find(|count| count.stage == stage)
    }

    /// Dropped enrollments whose failed lookup involved `side`.
    ///
    /// An enrollment missing both its user and its course counts towards
    /// `User`, `Course` and `Both`.
    pub fn dropped_on(&self, side: JoinSide) -> usize {
        self.warnings
            .iter()
            .filter(|warning| {
                matches!(
                    warning,
                    AuditWarning::UnmatchedEnrollment { side: found, .. } if found.involves(side)
                )
            })
            .count()
    }
}
