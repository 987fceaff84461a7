//! Hard validation failures raised at the record-model boundary.

use thiserror::Error;

use crate::records::EntityKind;

/// The constraint a field value violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Required field is absent or `null`.
    #[error("is required")]
    Missing,

    /// Field holds a JSON value of the wrong primitive type.
    #[error("must be a {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// Required string is empty after trimming.
    #[error("must not be blank")]
    Blank,

    /// Email address without an `@`.
    #[error("must contain '@' (found {0:?})")]
    InvalidEmail(String),

    /// Availability encoding outside the accepted set for the entity kind.
    #[error("must be \"Yes\" or \"No\" (found {0:?})")]
    InvalidAvailability(String),
}

/// A record failed structural or semantic validation.
///
/// Aborts the whole load; there is no partial or best-effort record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid {entity} record at index {index}{id}: `{field}` {violation}",
    id = describe_id(.record_id)
)]
pub struct ValidationError {
    /// Entity kind of the offending record.
    pub entity: EntityKind,
    /// Zero-based position of the record in its collection.
    pub index: usize,
    /// Record identifier, when the record carried a usable one.
    pub record_id: Option<String>,
    /// Dotted path of the offending field (`$` for the record itself).
    pub field: String,
    /// Violated constraint.
    pub violation: Violation,
}

fn describe_id(record_id: &Option<String>) -> String {
    match record_id {
        Some(id) => format!(" (id {id})"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_entity_field_and_constraint() {
        let error = ValidationError {
            entity: EntityKind::User,
            index: 2,
            record_id: Some("_2001_1".to_string()),
            field: "contact.email".to_string(),
            violation: Violation::InvalidEmail("jdoe.example.edu".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "invalid user record at index 2 (id _2001_1): `contact.email` must contain '@' (found \"jdoe.example.edu\")"
        );
    }

    #[test]
    fn display_without_record_id() {
        let error = ValidationError {
            entity: EntityKind::Course,
            index: 0,
            record_id: None,
            field: "id".to_string(),
            violation: Violation::Missing,
        };
        assert_eq!(
            error.to_string(),
            "invalid course record at index 0: `id` is required"
        );
    }
}
