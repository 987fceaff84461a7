//! Shared helpers for report rendering.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;

use enroll_model::JoinedRecord;

/// CSV artifact file name.
pub const CSV_FILE_NAME: &str = "enrollment_report.csv";

/// HTML artifact file name.
pub const HTML_FILE_NAME: &str = "enrollment_report.html";

/// Audit trail file name.
pub const AUDIT_FILE_NAME: &str = "audit.json";

/// LMS-style rendering of a boolean.
pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Headline counts over the emitted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub unique_courses: usize,
    pub unique_users: usize,
    pub enrollments: usize,
}

impl ReportSummary {
    pub fn from_records(records: &[JoinedRecord]) -> Self {
        let courses: BTreeSet<&str> = records.iter().map(|r| r.course.id.as_str()).collect();
        let users: BTreeSet<&str> = records.iter().map(|r| r.user.id.as_str()).collect();
        Self {
            unique_courses: courses.len(),
            unique_users: users.len(),
            enrollments: records.len(),
        }
    }
}

/// Write a simple text element.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }

    #[test]
    fn test_write_text_element_escapes() {
        let mut writer = Writer::new(Vec::new());
        write_text_element(&mut writer, "td", "R&D <lab>").unwrap();
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "<td>R&amp;D &lt;lab&gt;</td>");
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(ReportSummary::from_records(&[]), ReportSummary::default());
    }
}
