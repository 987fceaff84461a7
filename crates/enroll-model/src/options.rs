//! Configuration options for the enrollment pipeline.

use serde::{Deserialize, Serialize};

/// Mode for matching enrollment `type`/`role` values against the known vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Require the canonical spelling exactly.
    Strict,
    /// Case-insensitive, ignoring non-alphanumeric characters.
    #[default]
    Lenient,
}

/// What to do when two records of one collection share an internal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// The later record replaces the earlier one for lookups; a warning is recorded.
    #[default]
    LastWins,
    /// Abort the run.
    Reject,
}

/// Options for normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationOptions {
    pub matching: MatchingMode,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl NormalizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matching(mut self, matching: MatchingMode) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_duplicate_ids(mut self, policy: DuplicateIdPolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }
}

/// User-selected filters applied to joined records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub include_instructors: bool,
    pub include_students: bool,
    /// Case-insensitive substring of the SIS course id or course name.
    pub course_filter: Option<String>,
    /// Keep only records whose enrollment, user and course are all available.
    pub only_available: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            include_instructors: true,
            include_students: true,
            course_filter: None,
            only_available: false,
        }
    }
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instructors(mut self, include: bool) -> Self {
        self.include_instructors = include;
        self
    }

    pub fn with_students(mut self, include: bool) -> Self {
        self.include_students = include;
        self
    }

    pub fn with_course_filter(mut self, filter: Option<String>) -> Self {
        self.course_filter = filter;
        self
    }

    pub fn with_only_available(mut self, enable: bool) -> Self {
        self.only_available = enable;
        self
    }

    /// Lowercased, trimmed course filter; `None` when unset or blank.
    pub fn course_needle(&self) -> Option<String> {
        self.course_filter
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase)
    }
}

/// Options controlling one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub filter: FilterOptions,
    pub normalization: NormalizationOptions,
}

impl PipelineOptions {
    pub fn new(filter: FilterOptions) -> Self {
        Self {
            filter,
            normalization: NormalizationOptions::default(),
        }
    }

    pub fn with_normalization(mut self, normalization: NormalizationOptions) -> Self {
        self.normalization = normalization;
        self
    }
}
