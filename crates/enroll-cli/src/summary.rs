use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use enroll_cli::types::GenerateResult;
use enroll_model::{AuditWarning, JoinSide, RoleBucket, WarningCategory};

/// Record ids listed per warning category before eliding the rest.
const MAX_EXAMPLES: usize = 3;

pub fn print_summary(result: &GenerateResult) {
    println!("Data: {}", result.data_dir.display());
    match &result.outputs {
        Some(paths) => {
            println!("CSV: {}", paths.csv.display());
            println!("HTML: {}", paths.html.display());
            println!("Audit: {}", paths.audit.display());
        }
        None => println!("Dry run: nothing written to {}", result.out_dir.display()),
    }
    for (kind, info) in &result.inputs {
        if info.truncated {
            eprintln!(
                "warning: {} export is truncated (further pages not available offline)",
                kind.collection_name()
            );
        }
    }

    let audit = &result.audit;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("In"),
        header_cell("Out"),
        header_cell("Removed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        stage_cell("load"),
        dim_cell("-"),
        Cell::new(format!(
            "{} courses, {} users, {} enrollments",
            audit.loaded.courses, audit.loaded.users, audit.loaded.enrollments
        )),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        stage_cell("join"),
        Cell::new(audit.loaded.enrollments),
        Cell::new(audit.joined),
        count_cell(audit.dropped, Color::Yellow),
    ]);
    for stage in &audit.filter_stages {
        table.add_row(vec![
            stage_cell(&format!("filter: {}", stage.stage)),
            Cell::new(stage.before),
            Cell::new(stage.after),
            count_cell(stage.removed(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("EMITTED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(audit.emitted).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "Report: {} courses, {} users, {} enrollments",
        result.report.unique_courses, result.report.unique_users, result.report.enrollments
    );
    print_warning_table(result);
}

fn print_warning_table(result: &GenerateResult) {
    let audit = &result.audit;
    if audit.warnings.is_empty() {
        return;
    }
    let mut examples: BTreeMap<WarningCategory, Vec<&str>> = BTreeMap::new();
    for warning in &audit.warnings {
        examples
            .entry(warning.category())
            .or_default()
            .push(warning.record_id());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Warning"),
        header_cell("Count"),
        header_cell("Detail"),
        header_cell("Examples"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (category, ids) in &examples {
        table.add_row(vec![
            Cell::new(category.as_str()).fg(Color::Yellow),
            count_cell(audit.warning_count(*category), Color::Yellow),
            detail_cell(*category, &audit.warnings),
            example_cell(ids),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
}

/// Unmatched enrollments broken down by the side that failed to resolve.
fn detail_cell(category: WarningCategory, warnings: &[AuditWarning]) -> Cell {
    if category != WarningCategory::UnmatchedEnrollment {
        return dim_cell("-");
    }
    let mut sides: BTreeMap<&'static str, usize> = BTreeMap::new();
    for warning in warnings {
        if let AuditWarning::UnmatchedEnrollment { side, .. } = warning {
            *sides.entry(side_label(*side)).or_insert(0) += 1;
        }
    }
    let parts: Vec<String> = sides
        .iter()
        .map(|(side, count)| format!("{side}: {count}"))
        .collect();
    Cell::new(parts.join(", "))
}

fn side_label(side: JoinSide) -> &'static str {
    match side {
        JoinSide::User => "no user",
        JoinSide::Course => "no course",
        JoinSide::Both => "neither",
    }
}

fn example_cell(ids: &[&str]) -> Cell {
    let mut shown: Vec<&str> = ids.iter().copied().take(MAX_EXAMPLES).collect();
    shown.dedup();
    let mut text = shown.join(", ");
    if ids.len() > MAX_EXAMPLES {
        text.push_str(&format!(" (+{} more)", ids.len() - MAX_EXAMPLES));
    }
    Cell::new(text)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn stage_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

pub fn bucket_cell(bucket: RoleBucket) -> Cell {
    match bucket {
        RoleBucket::Instructor => Cell::new(bucket.as_str()).fg(Color::Blue),
        RoleBucket::Student => Cell::new(bucket.as_str()).fg(Color::Green),
        RoleBucket::Other => dim_cell(bucket.as_str()),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
