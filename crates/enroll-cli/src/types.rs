use std::path::PathBuf;

use enroll_ingest::SourceInfo;
use enroll_model::{AuditSummary, EntityKind, PipelineOptions};
use enroll_report::{ReportPaths, ReportSummary};

/// Settings for one `generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub options: PipelineOptions,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct GenerateResult {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub inputs: Vec<(EntityKind, SourceInfo)>,
    pub audit: AuditSummary,
    pub report: ReportSummary,
    /// `None` on a dry run.
    pub outputs: Option<ReportPaths>,
}
