pub mod audit;
pub mod derive;
pub mod error;
pub mod filter;
pub mod join;
pub mod normalize;
pub mod pipeline;

pub use audit::AuditCollector;
pub use derive::{LABEL_SEPARATOR, course_label, derive_all, derive_record, user_full_name};
pub use error::{Result, TransformError};
pub use filter::{apply_filters, availability_predicate, course_predicate, role_predicate};
pub use join::{Keyed, MatchedEnrollment, index_by_id, join_enrollments};
pub use normalize::{
    NormalizedInputs, derive_term, normalize_all, normalize_course, normalize_enrollment,
    normalize_user,
};
pub use pipeline::{PipelineInput, PipelineOutput, run_pipeline};
