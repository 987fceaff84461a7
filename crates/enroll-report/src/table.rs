//! CSV rendering of joined records.

use anyhow::{Context, Result};

use enroll_model::JoinedRecord;

use crate::common::yes_no;

/// Header row, in output order.
pub const CSV_COLUMNS: [&str; 13] = [
    "courseInternalId",
    "courseId",
    "courseName",
    "term",
    "userId",
    "userName",
    "userFullName",
    "email",
    "type",
    "role",
    "enrollmentAvailable",
    "userAvailable",
    "courseAvailable",
];

/// Renders the records as CSV, one row per record in pipeline order.
///
/// The header is written even when there are no records.
pub fn render_csv(records: &[JoinedRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS).context("write csv header")?;
    for record in records {
        let row: [&str; 13] = [
            &record.course.id,
            &record.course.course_id,
            &record.course.name,
            record.course.term.as_deref().unwrap_or(""),
            &record.user.id,
            &record.user.user_name,
            &record.user_full_name,
            &record.user.email,
            record.enrollment.category.as_str(),
            record.enrollment.role.as_str(),
            yes_no(record.enrollment.available),
            yes_no(record.user.available),
            yes_no(record.course.available),
        ];
        writer
            .write_record(row)
            .with_context(|| format!("write csv row for enrollment {}", record.enrollment.id))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context("flush csv")?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}
