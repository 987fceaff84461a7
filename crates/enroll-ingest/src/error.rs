//! Error types for export ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the three input collections.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Data directory not found or not a directory.
    #[error("data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Required collection file is missing.
    #[error("missing required data file: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === JSON Errors ===
    /// File is not valid JSON.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level value is neither an array nor a paged wrapper.
    #[error("expected an array or a paged object with `results` in {path}, got {found}")]
    UnexpectedShape { path: PathBuf, found: &'static str },

    /// Paged wrapper with an unusable `results` or `paging` member.
    #[error("malformed page in {path}: {reason}")]
    MalformedPage { path: PathBuf, reason: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("data/users.json"),
        };
        assert_eq!(err.to_string(), "missing required data file: data/users.json");

        let err = IngestError::UnexpectedShape {
            path: PathBuf::from("data/courses.json"),
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "expected an array or a paged object with `results` in data/courses.json, got string"
        );
    }
}
