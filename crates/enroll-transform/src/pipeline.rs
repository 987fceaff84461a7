//! End-to-end report pipeline: validate, normalize, join, derive, filter.
//!
//! The pipeline only sees raw JSON arrays; where they came from is the
//! loader's business. Output order is the enrollment input order, so the
//! same inputs and options always produce the same records.

use serde_json::Value;
use tracing::{info, info_span};

use enroll_model::{
    AuditSummary, CourseRecord, EnrollmentRecord, EntityKind, JoinedRecord, PipelineOptions,
    UserRecord, validate_collection,
};

use crate::audit::AuditCollector;
use crate::derive::derive_all;
use crate::error::Result;
use crate::filter::apply_filters;
use crate::join::join_enrollments;
use crate::normalize::normalize_all;

/// Raw collections of one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    pub courses: &'a [Value],
    pub users: &'a [Value],
    pub enrollments: &'a [Value],
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<JoinedRecord>,
    pub audit: AuditSummary,
}

/// Runs every stage. Fails on the first malformed record, or on a duplicate
/// id when the duplicate policy rejects them.
pub fn run_pipeline(input: PipelineInput<'_>, options: &PipelineOptions) -> Result<PipelineOutput> {
    let span = info_span!("pipeline");
    let _guard = span.enter();
    let mut audit = AuditCollector::new();
    audit.record_loaded(EntityKind::Course, input.courses.len());
    audit.record_loaded(EntityKind::User, input.users.len());
    audit.record_loaded(EntityKind::Enrollment, input.enrollments.len());

    let normalized = {
        let span = info_span!("validate");
        let _guard = span.enter();
        let courses = validate_collection::<CourseRecord>(input.courses)?;
        let users = validate_collection::<UserRecord>(input.users)?;
        let enrollments = validate_collection::<EnrollmentRecord>(input.enrollments)?;
        normalize_all(
            courses,
            users,
            enrollments,
            &options.normalization,
            &mut audit,
        )
    };

    let joined = {
        let span = info_span!("join");
        let _guard = span.enter();
        let matched = join_enrollments(
            &normalized,
            options.normalization.duplicate_ids,
            &mut audit,
        )?;
        derive_all(&matched)
    };

    let records = {
        let span = info_span!("filter");
        let _guard = span.enter();
        apply_filters(joined, &options.filter, &mut audit)
    };

    let audit = audit.finish(records.len());
    info!(
        joined = audit.joined,
        dropped = audit.dropped,
        emitted = audit.emitted,
        warnings = audit.total_warnings(),
        "pipeline complete"
    );
    Ok(PipelineOutput { records, audit })
}
