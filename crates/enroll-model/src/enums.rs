//! Known enrollment vocabularies and tolerant classification.
//!
//! The LMS controls these vocabularies and may extend them at any time,
//! so a value outside the known set is never an error. Classification
//! returns [`Classified::Unrecognized`] carrying the raw value, and callers
//! branch on the tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::options::MatchingMode;

/// Filter bucket of a recognized role value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBucket {
    /// Gated by `include_instructors`.
    Instructor,
    /// Gated by `include_students`.
    Student,
    /// Recognized, but never filtered by the role toggles.
    Other,
}

impl RoleBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleBucket::Instructor => "instructor",
            RoleBucket::Student => "student",
            RoleBucket::Other => "other",
        }
    }
}

impl fmt::Display for RoleBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of known values with canonical spellings.
pub trait Vocabulary: Copy + PartialEq + 'static {
    /// Source field name, for warnings and listings.
    const FIELD: &'static str;

    fn all() -> &'static [Self];

    /// Canonical spelling as exported by the LMS.
    fn as_str(self) -> &'static str;

    fn bucket(self) -> RoleBucket;

    /// Classify a raw value. Never fails.
    fn classify(raw: &str, mode: MatchingMode) -> Classified<Self> {
        let trimmed = raw.trim();
        let found = match mode {
            MatchingMode::Strict => Self::all()
                .iter()
                .copied()
                .find(|known| known.as_str() == trimmed),
            MatchingMode::Lenient => {
                let key = compact_key(trimmed);
                if key.is_empty() {
                    None
                } else {
                    Self::all()
                        .iter()
                        .copied()
                        .find(|known| compact_key(known.as_str()) == key)
                }
            }
        };
        match found {
            Some(value) => Classified::Recognized(value),
            None => Classified::Unrecognized(trimmed.to_string()),
        }
    }
}

/// Uppercase alphanumeric characters only; `"teaching assistant"` and
/// `"TeachingAssistant"` share a key.
fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect()
}

/// Result of checking a value against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified<T> {
    Recognized(T),
    Unrecognized(String),
}

impl<T: Vocabulary> Classified<T> {
    /// Canonical spelling when recognized, the raw value otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            Classified::Recognized(value) => value.as_str(),
            Classified::Unrecognized(raw) => raw,
        }
    }

    pub fn recognized(&self) -> Option<T> {
        match self {
            Classified::Recognized(value) => Some(*value),
            Classified::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Classified::Recognized(_))
    }

    pub fn bucket(&self) -> Option<RoleBucket> {
        self.recognized().map(Vocabulary::bucket)
    }
}

impl<T: Vocabulary> fmt::Display for Classified<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: Vocabulary> Serialize for Classified<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Course role category, the enrollment `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCategory {
    Instructor,
    TeachingAssistant,
    CourseBuilder,
    Grader,
    Student,
    Guest,
}

impl Vocabulary for RoleCategory {
    const FIELD: &'static str = "type";

    fn all() -> &'static [Self] {
        &[
            RoleCategory::Instructor,
            RoleCategory::TeachingAssistant,
            RoleCategory::CourseBuilder,
            RoleCategory::Grader,
            RoleCategory::Student,
            RoleCategory::Guest,
        ]
    }

    fn as_str(self) -> &'static str {
        match self {
            RoleCategory::Instructor => "Instructor",
            RoleCategory::TeachingAssistant => "TeachingAssistant",
            RoleCategory::CourseBuilder => "CourseBuilder",
            RoleCategory::Grader => "Grader",
            RoleCategory::Student => "Student",
            RoleCategory::Guest => "Guest",
        }
    }

    fn bucket(self) -> RoleBucket {
        match self {
            RoleCategory::Instructor | RoleCategory::TeachingAssistant => RoleBucket::Instructor,
            RoleCategory::Student => RoleBucket::Student,
            RoleCategory::CourseBuilder | RoleCategory::Grader | RoleCategory::Guest => {
                RoleBucket::Other
            }
        }
    }
}

/// Functional course role, the enrollment `role` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseRole {
    Instructor,
    TeachingAssistant,
    Student,
    Grader,
    Observer,
}

impl Vocabulary for CourseRole {
    const FIELD: &'static str = "role";

    fn all() -> &'static [Self] {
        &[
            CourseRole::Instructor,
            CourseRole::TeachingAssistant,
            CourseRole::Student,
            CourseRole::Grader,
            CourseRole::Observer,
        ]
    }

    fn as_str(self) -> &'static str {
        match self {
            CourseRole::Instructor => "Instructor",
            CourseRole::TeachingAssistant => "TeachingAssistant",
            CourseRole::Student => "Student",
            CourseRole::Grader => "Grader",
            CourseRole::Observer => "Observer",
        }
    }

    fn bucket(self) -> RoleBucket {
        match self {
            CourseRole::Instructor | CourseRole::TeachingAssistant => RoleBucket::Instructor,
            CourseRole::Student => RoleBucket::Student,
            CourseRole::Grader | CourseRole::Observer => RoleBucket::Other,
        }
    }
}

macro_rules! vocabulary_traits {
    ($($ty:ty),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            /// Lenient parse: case-insensitive, ignoring spaces and punctuation.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Vocabulary>::classify(s, MatchingMode::Lenient)
                    .recognized()
                    .ok_or_else(|| format!("Unknown {}: {s}", <$ty as Vocabulary>::FIELD))
            }
        }
    )+};
}

vocabulary_traits!(RoleCategory, CourseRole);
