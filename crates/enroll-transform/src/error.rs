use thiserror::Error;

use enroll_model::{EntityKind, ValidationError};

/// Hard failures that abort a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Two records of one collection share an id under `DuplicateIdPolicy::Reject`.
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: EntityKind, id: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;
