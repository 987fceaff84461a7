//! Report filters over joined records.
//!
//! Stages run in [`FilterStage::ORDER`]: role, course, availability. Every
//! stage records its before/after counts, including inactive ones.

use tracing::debug;

use enroll_model::{FilterOptions, FilterStage, JoinedRecord, RoleBucket};

use crate::audit::AuditCollector;

/// Instructor-bucket records need `include_instructors`, student-bucket
/// records need `include_students`. Anything else always passes.
pub fn role_predicate(record: &JoinedRecord, options: &FilterOptions) -> bool {
    match record.enrollment.bucket() {
        Some(RoleBucket::Instructor) => options.include_instructors,
        Some(RoleBucket::Student) => options.include_students,
        Some(RoleBucket::Other) | None => true,
    }
}

/// Case-insensitive substring match on the SIS course id or the course name.
/// `needle` must already be lowercased.
pub fn course_predicate(record: &JoinedRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    record.course.course_id.to_lowercase().contains(needle)
        || record.course.name.to_lowercase().contains(needle)
}

pub fn availability_predicate(record: &JoinedRecord, options: &FilterOptions) -> bool {
    !options.only_available || record.fully_available()
}

/// Applies every stage in order, keeping the relative order of survivors.
pub fn apply_filters(
    mut records: Vec<JoinedRecord>,
    options: &FilterOptions,
    audit: &mut AuditCollector,
) -> Vec<JoinedRecord> {
    let needle = options.course_needle();
    for stage in FilterStage::ORDER {
        let before = records.len();
        match stage {
            FilterStage::Role => records.retain(|record| role_predicate(record, options)),
            FilterStage::Course => {
                records.retain(|record| course_predicate(record, needle.as_deref()))
            }
            FilterStage::Availability => {
                records.retain(|record| availability_predicate(record, options))
            }
        }
        debug!(stage = %stage, before, after = records.len(), "filter stage");
        audit.record_stage(stage, before, records.len());
    }
    records
}
