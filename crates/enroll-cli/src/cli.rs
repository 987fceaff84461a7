//! CLI argument definitions for the enrollment report generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "enroll",
    version,
    about = "LMS enrollment reports - Join courses, users and enrollments into CSV/HTML",
    long_about = "Generate enrollment reports from LMS REST exports.\n\n\
                  Reads courses.json, users.json and enrollments.json from a data\n\
                  directory and writes a CSV table, an HTML report and an audit trail."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate CSV, HTML and audit JSON from exported LMS data.
    Generate(GenerateArgs),

    /// List recognized enrollment role categories and course roles.
    Roles,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Directory containing courses.json, users.json and enrollments.json.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Output directory for the report artifacts.
    #[arg(long = "out-dir", value_name = "DIR", default_value = "./out")]
    pub out_dir: PathBuf,

    /// Keep only courses whose SIS id or name contains this text.
    ///
    /// Matching ignores case and surrounding whitespace; blank text disables
    /// the filter.
    #[arg(long = "course-filter", value_name = "TEXT")]
    pub course_filter: Option<String>,

    /// Include instructors and teaching assistants (default).
    #[arg(long = "include-instructors", overrides_with = "no_include_instructors")]
    pub include_instructors: bool,

    /// Exclude instructors and teaching assistants.
    #[arg(long = "no-include-instructors", overrides_with = "include_instructors")]
    pub no_include_instructors: bool,

    /// Include students (default).
    #[arg(long = "include-students", overrides_with = "no_include_students")]
    pub include_students: bool,

    /// Exclude students.
    #[arg(long = "no-include-students", overrides_with = "include_students")]
    pub no_include_students: bool,

    /// Keep only enrollments whose enrollment, user and course are all available.
    #[arg(long = "only-available")]
    pub only_available: bool,

    /// Require canonical spelling of enrollment type and role values.
    ///
    /// By default values are matched case-insensitively, ignoring spaces and
    /// punctuation, so "student" or "teaching assistant" count as known
    /// roles without a warning. With --strict only the exact spellings
    /// listed by the roles command are known; anything else is kept and reported as
    /// an unknown-role warning.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Fail when two courses or two users share an internal id.
    ///
    /// Without this flag the later record wins and a warning is recorded.
    #[arg(long = "reject-duplicate-ids")]
    pub reject_duplicate_ids: bool,

    /// Run the pipeline and print the summary without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn instructors(&self) -> bool {
        !self.no_include_instructors
    }

    pub fn students(&self) -> bool {
        !self.no_include_students
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
