use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use enroll_ingest::{RawInputs, SourceInfo};
use enroll_model::{EntityKind, PipelineOptions};

/// Run metadata echoed into the rendered artifacts.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub options: PipelineOptions,
    /// Provenance of each input, keyed by collection name.
    pub inputs: BTreeMap<String, SourceInfo>,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(data_dir: &Path, out_dir: &Path, options: PipelineOptions) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            options,
            inputs: BTreeMap::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_inputs(mut self, inputs: &RawInputs) -> Self {
        for kind in EntityKind::ALL {
            self.inputs.insert(
                kind.collection_name().to_string(),
                inputs.get(kind).info.clone(),
            );
        }
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// RFC 3339 timestamp, whole seconds, `Z` suffix.
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
