//! Audit trail JSON.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use enroll_ingest::SourceInfo;
use enroll_model::{AuditSummary, DuplicateIdPolicy, LoadCounts, MatchingMode};

use crate::common::ReportSummary;
use crate::context::ReportContext;

const AUDIT_SCHEMA: &str = "enroll-report.audit";
const AUDIT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct AuditReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub args: RunArguments<'a>,
    pub input_sizes: &'a LoadCounts,
    /// Origin, record count and SHA-256 of each input, keyed by collection.
    pub inputs: &'a BTreeMap<String, SourceInfo>,
    pub output_sizes: OutputSizes,
    pub filters: FilterSettings<'a>,
    pub summary: &'a AuditSummary,
}

#[derive(Debug, Serialize)]
pub struct RunArguments<'a> {
    pub data_dir: String,
    pub out_dir: String,
    pub course_filter: Option<&'a str>,
    pub include_instructors: bool,
    pub include_students: bool,
    pub only_available: bool,
    pub matching: MatchingMode,
    pub duplicate_ids: DuplicateIdPolicy,
}

#[derive(Debug, Serialize)]
pub struct OutputSizes {
    pub csv_rows: usize,
    pub unique_courses: usize,
    pub unique_users: usize,
}

#[derive(Debug, Serialize)]
pub struct FilterSettings<'a> {
    pub only_available: bool,
    pub course_filter: Option<&'a str>,
    pub roles_included: RolesIncluded,
}

#[derive(Debug, Serialize)]
pub struct RolesIncluded {
    pub instructors: bool,
    pub students: bool,
}

pub fn build_audit_payload<'a>(
    context: &'a ReportContext,
    audit: &'a AuditSummary,
    summary: &ReportSummary,
) -> AuditReportPayload<'a> {
    let filter = &context.options.filter;
    let normalization = &context.options.normalization;
    AuditReportPayload {
        schema: AUDIT_SCHEMA,
        schema_version: AUDIT_SCHEMA_VERSION,
        generated_at: context.timestamp(),
        args: RunArguments {
            data_dir: context.data_dir.display().to_string(),
            out_dir: context.out_dir.display().to_string(),
            course_filter: filter.course_filter.as_deref(),
            include_instructors: filter.include_instructors,
            include_students: filter.include_students,
            only_available: filter.only_available,
            matching: normalization.matching,
            duplicate_ids: normalization.duplicate_ids,
        },
        input_sizes: &audit.loaded,
        inputs: &context.inputs,
        output_sizes: OutputSizes {
            csv_rows: summary.enrollments,
            unique_courses: summary.unique_courses,
            unique_users: summary.unique_users,
        },
        filters: FilterSettings {
            only_available: filter.only_available,
            course_filter: filter.course_filter.as_deref(),
            roles_included: RolesIncluded {
                instructors: filter.include_instructors,
                students: filter.include_students,
            },
        },
        summary: audit,
    }
}

/// Pretty-printed audit JSON with a trailing newline.
pub fn render_audit_json(
    context: &ReportContext,
    audit: &AuditSummary,
    summary: &ReportSummary,
) -> Result<String> {
    let payload = build_audit_payload(context, audit, summary);
    let json = serde_json::to_string_pretty(&payload).context("serialize audit trail")?;
    Ok(format!("{json}\n"))
}
