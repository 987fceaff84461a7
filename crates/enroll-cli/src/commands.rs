use anyhow::Result;
use comfy_table::Table;

use enroll_cli::pipeline::generate;
use enroll_cli::types::{GenerateConfig, GenerateResult};
use enroll_model::{
    CourseRole, DuplicateIdPolicy, FilterOptions, MatchingMode, NormalizationOptions,
    PipelineOptions, RoleCategory, Vocabulary,
};

use crate::cli::GenerateArgs;
use crate::summary::{apply_table_style, bucket_cell, header_cell};

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    generate(&generate_config(args))
}

fn generate_config(args: &GenerateArgs) -> GenerateConfig {
    let filter = FilterOptions::new()
        .with_instructors(args.instructors())
        .with_students(args.students())
        .with_course_filter(args.course_filter.clone())
        .with_only_available(args.only_available);
    let normalization = NormalizationOptions::new()
        .with_matching(if args.strict {
            MatchingMode::Strict
        } else {
            MatchingMode::Lenient
        })
        .with_duplicate_ids(if args.reject_duplicate_ids {
            DuplicateIdPolicy::Reject
        } else {
            DuplicateIdPolicy::LastWins
        });
    GenerateConfig {
        data_dir: args.data_dir.clone(),
        out_dir: args.out_dir.clone(),
        options: PipelineOptions::new(filter).with_normalization(normalization),
        dry_run: args.dry_run,
    }
}

pub fn run_roles() -> Result<()> {
    println!("{}", vocabulary_table::<RoleCategory>());
    println!("{}", vocabulary_table::<CourseRole>());
    Ok(())
}

fn vocabulary_table<T: Vocabulary>() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(T::FIELD), header_cell("Filter bucket")]);
    apply_table_style(&mut table);
    for value in T::all() {
        table.add_row(vec![value.as_str().into(), bucket_cell(value.bucket())]);
    }
    table
}
