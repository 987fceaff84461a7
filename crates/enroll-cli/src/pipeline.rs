//! Load, transform and render in one call.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use enroll_ingest::{DirectorySource, load_inputs};
use enroll_model::EntityKind;
use enroll_report::{ReportContext, ReportSummary, render_reports, write_reports};
use enroll_transform::{PipelineInput, run_pipeline};

use crate::types::{GenerateConfig, GenerateResult};

pub fn generate(config: &GenerateConfig) -> Result<GenerateResult> {
    let span = info_span!("generate", data_dir = %config.data_dir.display());
    let _guard = span.enter();

    let mut source = DirectorySource::open(&config.data_dir)
        .with_context(|| format!("open data directory {}", config.data_dir.display()))?;
    let raw = load_inputs(&mut source).context("load inputs")?;

    let output = run_pipeline(
        PipelineInput {
            courses: &raw.courses.records,
            users: &raw.users.records,
            enrollments: &raw.enrollments.records,
        },
        &config.options,
    )
    .context("run pipeline")?;

    let context = ReportContext::new(&config.data_dir, &config.out_dir, config.options.clone())
        .with_inputs(&raw);
    let (report, outputs) = if config.dry_run {
        let rendered = render_reports(&context, &output.records, &output.audit)?;
        info!(rows = rendered.summary.enrollments, "dry run, nothing written");
        (rendered.summary, None)
    } else {
        let paths = write_reports(&context, &output.records, &output.audit)
            .with_context(|| format!("write reports to {}", config.out_dir.display()))?;
        (ReportSummary::from_records(&output.records), Some(paths))
    };

    Ok(GenerateResult {
        data_dir: config.data_dir.clone(),
        out_dir: config.out_dir.clone(),
        inputs: EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, raw.get(kind).info.clone()))
            .collect(),
        audit: output.audit,
        report,
        outputs,
    })
}
