//! Self-contained HTML report.

use std::io::Write;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use enroll_model::JoinedRecord;

use crate::common::{ReportSummary, write_text_element, yes_no};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:.25rem .5rem;text-align:left}\
th{background:#f4f4f4}";

const HEADINGS: [&str; 7] = [
    "Course",
    "Term",
    "User",
    "Role",
    "Enrollment available",
    "User available",
    "Course available",
];

/// Renders the summary block and one table row per record. All text is
/// escaped by the XML writer.
pub fn render_html(
    records: &[JoinedRecord],
    summary: &ReportSummary,
    generated_at: &str,
) -> Result<String> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(b"<!DOCTYPE html>\n");
    let mut html = Writer::new_with_indent(buffer, b' ', 2);

    let mut root = BytesStart::new("html");
    root.push_attribute(("lang", "en"));
    html.write_event(Event::Start(root))?;

    html.write_event(Event::Start(BytesStart::new("head")))?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    html.write_event(Event::Empty(meta))?;
    write_text_element(&mut html, "title", "Enrollment Report")?;
    write_text_element(&mut html, "style", STYLE)?;
    html.write_event(Event::End(BytesEnd::new("head")))?;

    html.write_event(Event::Start(BytesStart::new("body")))?;
    write_text_element(&mut html, "h1", "Enrollment Report")?;
    write_summary(&mut html, summary, generated_at)?;
    write_table(&mut html, records)?;
    html.write_event(Event::End(BytesEnd::new("body")))?;

    html.write_event(Event::End(BytesEnd::new("html")))?;

    let mut bytes = html.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("html output is not utf-8")
}

fn write_summary<W: Write>(
    html: &mut Writer<W>,
    summary: &ReportSummary,
    generated_at: &str,
) -> Result<()> {
    let mut list = BytesStart::new("ul");
    list.push_attribute(("class", "summary"));
    html.write_event(Event::Start(list))?;
    write_text_element(html, "li", &format!("Courses: {}", summary.unique_courses))?;
    write_text_element(html, "li", &format!("Users: {}", summary.unique_users))?;
    write_text_element(html, "li", &format!("Enrollments: {}", summary.enrollments))?;
    write_text_element(html, "li", &format!("Generated: {generated_at}"))?;
    html.write_event(Event::End(BytesEnd::new("ul")))?;
    Ok(())
}

fn write_table<W: Write>(html: &mut Writer<W>, records: &[JoinedRecord]) -> Result<()> {
    html.write_event(Event::Start(BytesStart::new("table")))?;

    html.write_event(Event::Start(BytesStart::new("thead")))?;
    html.write_event(Event::Start(BytesStart::new("tr")))?;
    for heading in HEADINGS {
        write_text_element(html, "th", heading)?;
    }
    html.write_event(Event::End(BytesEnd::new("tr")))?;
    html.write_event(Event::End(BytesEnd::new("thead")))?;

    html.write_event(Event::Start(BytesStart::new("tbody")))?;
    for record in records {
        html.write_event(Event::Start(BytesStart::new("tr")))?;
        write_text_element(html, "td", &record.course_label)?;
        write_text_element(html, "td", record.course.term.as_deref().unwrap_or(""))?;
        write_text_element(html, "td", &record.user_full_name)?;
        write_text_element(html, "td", record.enrollment.role.as_str())?;
        write_text_element(html, "td", yes_no(record.enrollment.available))?;
        write_text_element(html, "td", yes_no(record.user.available))?;
        write_text_element(html, "td", yes_no(record.course.available))?;
        html.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    html.write_event(Event::End(BytesEnd::new("tbody")))?;

    html.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}
