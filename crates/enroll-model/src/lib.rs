//! Data model for LMS enrollment reporting.
//!
//! - **records**: strict record models over the raw JSON export
//! - **entities**: canonical entities and the joined record
//! - **enums**: known role vocabularies and tolerant classification
//! - **audit**: audit summary of a pipeline run
//! - **options**: filter and normalization options

pub mod audit;
pub mod entities;
pub mod enums;
pub mod error;
pub mod options;
pub mod records;

pub use audit::{
    AuditSummary, AuditWarning, FilterStage, JoinSide, LoadCounts, StageCount, WarningCategory,
};
pub use entities::{Course, Enrollment, JoinedRecord, User};
pub use enums::{Classified, CourseRole, RoleBucket, RoleCategory, Vocabulary};
pub use error::{Result, ValidationError, Violation};
pub use options::{
    DuplicateIdPolicy, FilterOptions, MatchingMode, NormalizationOptions, PipelineOptions,
};
pub use records::{
    Contact, CourseRecord, EnrollmentRecord, EntityKind, NameParts, RecordModel, UserRecord,
    YesNo, json_kind, validate_collection,
};
