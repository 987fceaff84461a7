//! Record models: strict typed views over the raw JSON export.
//!
//! Each entity kind has one record type. Conversion from a raw
//! `serde_json::Value` is the only place the pipeline inspects JSON;
//! everything downstream works on these types.
//!
//! Rules enforced here:
//! - required fields must be present, non-null and of the right JSON type
//! - required strings are trimmed and must not be blank
//! - optional strings that are absent, `null` or blank become `None`
//! - `contact.email` must contain `@`
//! - course and user availability must be the literal `"Yes"` or `"No"`;
//!   enrollment availability must be a JSON boolean

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError, Violation};

/// The three collections of an LMS export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Course,
    User,
    Enrollment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Course, EntityKind::User, EntityKind::Enrollment];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::User => "user",
            EntityKind::Enrollment => "enrollment",
        }
    }

    /// File stem of the collection in a data directory (`courses.json`, ...).
    pub fn collection_name(self) -> &'static str {
        match self {
            EntityKind::Course => "courses",
            EntityKind::User => "users",
            EntityKind::Enrollment => "enrollments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type of a value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Learn-style availability flag used by courses and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Accepts exactly `"Yes"` or `"No"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(YesNo::Yes),
            "No" => Some(YesNo::No),
            _ => None,
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub description: Option<String>,
    pub availability: YesNo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub given: String,
    pub family: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub user_name: String,
    pub name: NameParts,
    pub contact: Contact,
    pub availability: YesNo,
}

/// Enrollment as exported. `enrollment_type` and `role` are kept verbatim;
/// classification against the known vocabularies happens in normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrollment_type: String,
    pub role: String,
    pub available: bool,
}

/// A typed record model for one entity kind.
pub trait RecordModel: Sized {
    const KIND: EntityKind;

    /// Validate one raw record at `index` of its collection.
    fn from_json(index: usize, value: &Value) -> Result<Self>;
}

impl RecordModel for CourseRecord {
    const KIND: EntityKind = EntityKind::Course;

    fn from_json(index: usize, value: &Value) -> Result<Self> {
        let fields = FieldReader::new(Self::KIND, index, value)?;
        Ok(Self {
            id: fields.required_str("id")?,
            course_id: fields.required_str("courseId")?,
            name: fields.required_str("name")?,
            description: fields.optional_str("description")?,
            availability: fields.required_yes_no("availability.available")?,
        })
    }
}

impl RecordModel for UserRecord {
    const KIND: EntityKind = EntityKind::User;

    fn from_json(index: usize, value: &Value) -> Result<Self> {
        let fields = FieldReader::new(Self::KIND, index, value)?;
        Ok(Self {
            id: fields.required_str("id")?,
            user_name: fields.required_str("userName")?,
            name: NameParts {
                given: fields.required_str("name.given")?,
                family: fields.required_str("name.family")?,
            },
            contact: Contact {
                email: fields.required_email("contact.email")?,
            },
            availability: fields.required_yes_no("availability.available")?,
        })
    }
}

impl RecordModel for EnrollmentRecord {
    const KIND: EntityKind = EntityKind::Enrollment;

    fn from_json(index: usize, value: &Value) -> Result<Self> {
        let fields = FieldReader::new(Self::KIND, index, value)?;
        Ok(Self {
            id: fields.required_str("id")?,
            user_id: fields.required_str("userId")?,
            course_id: fields.required_str("courseId")?,
            enrollment_type: fields.required_str("type")?,
            role: fields.required_str("role")?,
            available: fields.required_bool("availability.available")?,
        })
    }
}

/// Validate a whole collection, stopping at the first malformed record.
pub fn validate_collection<T: RecordModel>(values: &[Value]) -> Result<Vec<T>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| T::from_json(index, value))
        .collect()
}

/// Field access over one raw record with error context attached.
struct FieldReader<'a> {
    entity: EntityKind,
    index: usize,
    record_id: Option<String>,
    object: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    fn new(entity: EntityKind, index: usize, value: &'a Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(ValidationError {
                entity,
                index,
                record_id: None,
                field: "$".to_string(),
                violation: Violation::WrongType {
                    expected: "object",
                    found: json_kind(value),
                },
            });
        };
        let record_id = object
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Ok(Self {
            entity,
            index,
            record_id,
            object,
        })
    }

    fn error(&self, field: &str, violation: Violation) -> ValidationError {
        ValidationError {
            entity: self.entity,
            index: self.index,
            record_id: self.record_id.clone(),
            field: field.to_string(),
            violation,
        }
    }

    /// Resolve a dotted path. `null` counts as absent.
    fn lookup(&self, path: &str) -> Result<Option<&'a Value>> {
        let mut current = self.object;
        let mut segments = path.split('.').peekable();
        let mut walked = 0usize;
        while let Some(segment) = segments.next() {
            walked += segment.len();
            let value = match current.get(segment) {
                None | Some(Value::Null) => return Ok(None),
                Some(value) => value,
            };
            if segments.peek().is_none() {
                return Ok(Some(value));
            }
            match value {
                Value::Object(inner) => current = inner,
                other => {
                    return Err(self.error(
                        &path[..walked],
                        Violation::WrongType {
                            expected: "object",
                            found: json_kind(other),
                        },
                    ));
                }
            }
            walked += 1;
        }
        Ok(None)
    }

    fn string_at(&self, path: &str) -> Result<Option<String>> {
        match self.lookup(path)? {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.trim().to_string())),
            Some(other) => Err(self.error(
                path,
                Violation::WrongType {
                    expected: "string",
                    found: json_kind(other),
                },
            )),
        }
    }

    fn required_str(&self, path: &str) -> Result<String> {
        let value = self
            .string_at(path)?
            .ok_or_else(|| self.error(path, Violation::Missing))?;
        if value.is_empty() {
            return Err(self.error(path, Violation::Blank));
        }
        Ok(value)
    }

    fn optional_str(&self, path: &str) -> Result<Option<String>> {
        Ok(self.string_at(path)?.filter(|value| !value.is_empty()))
    }

    fn required_email(&self, path: &str) -> Result<String> {
        let email = self.required_str(path)?;
        if !email.contains('@') {
            return Err(self.error(path, Violation::InvalidEmail(email)));
        }
        Ok(email)
    }

    fn required_yes_no(&self, path: &str) -> Result<YesNo> {
        match self.lookup(path)? {
            None => Err(self.error(path, Violation::Missing)),
            Some(Value::String(text)) => YesNo::parse(text)
                .ok_or_else(|| self.error(path, Violation::InvalidAvailability(text.clone()))),
            Some(other) => Err(self.error(
                path,
                Violation::InvalidAvailability(other.to_string()),
            )),
        }
    }

    fn required_bool(&self, path: &str) -> Result<bool> {
        match self.lookup(path)? {
            None => Err(self.error(path, Violation::Missing)),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(self.error(
                path,
                Violation::WrongType {
                    expected: "boolean",
                    found: json_kind(other),
                },
            )),
        }
    }
}
