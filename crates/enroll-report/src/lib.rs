//! Enrollment report rendering.
//!
//! - **CSV**: one row per joined record, booleans as `Yes`/`No`
//! - **HTML**: summary block and record table
//! - **Audit JSON**: run arguments, input digests and the full audit summary

mod audit_json;
mod common;
mod context;
mod html;
mod table;
mod writer;

pub use audit_json::{
    AuditReportPayload, FilterSettings, OutputSizes, RolesIncluded, RunArguments,
    build_audit_payload, render_audit_json,
};
pub use common::{AUDIT_FILE_NAME, CSV_FILE_NAME, HTML_FILE_NAME, ReportSummary, yes_no};
pub use context::ReportContext;
pub use html::render_html;
pub use table::{CSV_COLUMNS, render_csv};
pub use writer::{RenderedReports, ReportPaths, render_reports, write_reports};
