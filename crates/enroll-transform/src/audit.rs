//! Audit collector threaded through every pipeline stage.
//!
//! Write-only while the run is in progress; [`AuditCollector::finish`]
//! consumes it and returns the read-only [`AuditSummary`]. Each run owns its
//! collector, so concurrent runs in one process never share state.

use std::collections::BTreeMap;

use tracing::warn;

use enroll_model::{
    AuditSummary, AuditWarning, EntityKind, FilterStage, LoadCounts, StageCount, WarningCategory,
};

#[derive(Debug, Default)]
pub struct AuditCollector {
    loaded: LoadCounts,
    joined: usize,
    dropped: usize,
    stages: Vec<StageCount>,
    warnings: Vec<AuditWarning>,
}

impl AuditCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_loaded(&mut self, kind: EntityKind, count: usize) {
        match kind {
            EntityKind::Course => self.loaded.courses = count,
            EntityKind::User => self.loaded.users = count,
            EntityKind::Enrollment => self.loaded.enrollments = count,
        }
    }

    /// Append a tolerated anomaly. Also logged at warn level.
    pub fn warn(&mut self, warning: AuditWarning) {
        warn!(category = %warning.category(), record_id = warning.record_id(), "{warning}");
        self.warnings.push(warning);
    }

    pub fn record_join(&mut self, joined: usize, dropped: usize) {
        self.joined = joined;
        self.dropped = dropped;
    }

    pub fn record_stage(&mut self, stage: FilterStage, before: usize, after: usize) {
        self.stages.push(StageCount {
            stage,
            before,
            after,
        });
    }

    /// Number of warnings appended so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Finalize the run with the number of records handed to rendering.
    pub fn finish(self, emitted: usize) -> AuditSummary {
        let mut warning_counts: BTreeMap<WarningCategory, usize> = BTreeMap::new();
        for warning in &self.warnings {
            *warning_counts.entry(warning.category()).or_insert(0) += 1;
        }
        AuditSummary {
            loaded: self.loaded,
            joined: self.joined,
            dropped: self.dropped,
            filter_stages: self.stages,
            emitted,
            warning_counts,
            warnings: self.warnings,
        }
    }
}
