//! All-or-nothing artifact writing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use enroll_model::{AuditSummary, JoinedRecord};

use crate::audit_json::render_audit_json;
use crate::common::{AUDIT_FILE_NAME, CSV_FILE_NAME, HTML_FILE_NAME, ReportSummary};
use crate::context::ReportContext;
use crate::html::render_html;
use crate::table::render_csv;

/// Rendered artifacts, held in memory until every one has succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReports {
    pub csv: String,
    pub html: String,
    pub audit: String,
    pub summary: ReportSummary,
}

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub html: PathBuf,
    pub audit: PathBuf,
}

pub fn render_reports(
    context: &ReportContext,
    records: &[JoinedRecord],
    audit: &AuditSummary,
) -> Result<RenderedReports> {
    let summary = ReportSummary::from_records(records);
    Ok(RenderedReports {
        csv: render_csv(records).context("render csv")?,
        html: render_html(records, &summary, &context.timestamp()).context("render html")?,
        audit: render_audit_json(context, audit, &summary).context("render audit trail")?,
        summary,
    })
}

/// Renders every artifact, then writes them into `context.out_dir`.
///
/// Nothing touches the output directory unless all renders succeed. All
/// three files are staged as temporary siblings before any of them is
/// renamed into place; a failure at any step removes the staged files and
/// restores the artifacts of the previous run.
pub fn write_reports(
    context: &ReportContext,
    records: &[JoinedRecord],
    audit: &AuditSummary,
) -> Result<ReportPaths> {
    let rendered = render_reports(context, records, audit)?;
    let out_dir = context.out_dir.as_path();
    let artifacts = [
        (CSV_FILE_NAME, rendered.csv.as_str()),
        (HTML_FILE_NAME, rendered.html.as_str()),
        (AUDIT_FILE_NAME, rendered.audit.as_str()),
    ];
    for (file_name, _) in &artifacts {
        let path = out_dir.join(file_name);
        if path.is_dir() {
            bail!("cannot write {}: a directory is in the way", path.display());
        }
    }
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let mut staged = Vec::with_capacity(artifacts.len());
    for (file_name, contents) in artifacts {
        match StagedArtifact::write(out_dir, file_name, contents) {
            Ok(artifact) => staged.push(artifact),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }
    commit(&staged)?;

    info!(
        out_dir = %out_dir.display(),
        rows = rendered.summary.enrollments,
        "wrote reports"
    );
    Ok(ReportPaths {
        csv: out_dir.join(CSV_FILE_NAME),
        html: out_dir.join(HTML_FILE_NAME),
        audit: out_dir.join(AUDIT_FILE_NAME),
    })
}

/// A fully written temporary file waiting to replace `path`.
struct StagedArtifact {
    temp: PathBuf,
    path: PathBuf,
}

impl StagedArtifact {
    fn write(dir: &Path, file_name: &str, contents: &str) -> Result<Self> {
        let temp = dir.join(format!(".{file_name}.tmp"));
        if let Err(err) = fs::write(&temp, contents) {
            let _ = fs::remove_file(&temp);
            return Err(err).with_context(|| format!("write {}", temp.display()));
        }
        debug!(path = %temp.display(), bytes = contents.len(), "staged artifact");
        Ok(Self {
            temp,
            path: dir.join(file_name),
        })
    }

    fn backup_path(&self) -> PathBuf {
        self.temp.with_extension("bak")
    }

    /// Moves an existing artifact aside and renames the staged file into
    /// place. Returns the backup location, if there was anything to keep.
    fn replace(&self) -> Result<Option<PathBuf>> {
        let backup = if self.path.exists() {
            let backup = self.backup_path();
            fs::rename(&self.path, &backup)
                .with_context(|| format!("move aside {}", self.path.display()))?;
            Some(backup)
        } else {
            None
        };
        if let Err(err) = fs::rename(&self.temp, &self.path) {
            if let Some(backup) = &backup {
                let _ = fs::rename(backup, &self.path);
            }
            return Err(err).with_context(|| format!("rename to {}", self.path.display()));
        }
        Ok(backup)
    }
}

fn commit(staged: &[StagedArtifact]) -> Result<()> {
    let mut committed: Vec<(&StagedArtifact, Option<PathBuf>)> = Vec::with_capacity(staged.len());
    for artifact in staged {
        match artifact.replace() {
            Ok(backup) => committed.push((artifact, backup)),
            Err(err) => {
                roll_back(&committed);
                discard(staged);
                return Err(err);
            }
        }
    }
    for (_, backup) in committed {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(())
}

/// Restores the previous run's artifacts over already committed ones.
fn roll_back(committed: &[(&StagedArtifact, Option<PathBuf>)]) {
    for (artifact, backup) in committed.iter().rev() {
        let restored = match backup {
            Some(backup) => fs::rename(backup, &artifact.path),
            None => fs::remove_file(&artifact.path),
        };
        if let Err(err) = restored {
            warn!(path = %artifact.path.display(), error = %err, "failed to roll back artifact");
        }
    }
}

fn discard(staged: &[StagedArtifact]) {
    for artifact in staged {
        let _ = fs::remove_file(&artifact.temp);
    }
}
