//! Record sources: where the three raw collections come from.
//!
//! The pipeline only ever sees [`RawInputs`], flat arrays of raw JSON
//! records. A directory of exported files is the one source today; a live
//! REST client (with its own paging, retries and backoff) would be another
//! [`RecordSource`] producing the same output.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use sha2::Digest;
use tracing::{debug, info, info_span, warn};

use enroll_model::EntityKind;

use crate::discovery::{InputFiles, locate_inputs};
use crate::error::{IngestError, Result};
use crate::pages::{parse_page, unwrap_pages};

/// Hex-encoded SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// One raw collection and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedCollection {
    pub kind: EntityKind,
    pub records: Vec<Value>,
    pub info: SourceInfo,
}

/// Provenance of a loaded collection, echoed into the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    /// File path or URL the records were read from.
    pub origin: String,
    pub records: usize,
    pub sha256: String,
    /// The source advertised further pages that were not read.
    pub truncated: bool,
}

/// Raw inputs of one run, one flat array per entity kind.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub courses: LoadedCollection,
    pub users: LoadedCollection,
    pub enrollments: LoadedCollection,
}

impl RawInputs {
    pub fn get(&self, kind: EntityKind) -> &LoadedCollection {
        match kind {
            EntityKind::Course => &self.courses,
            EntityKind::User => &self.users,
            EntityKind::Enrollment => &self.enrollments,
        }
    }
}

/// Supplier of raw collections.
pub trait RecordSource {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch every record of one collection, pages already unwrapped.
    fn fetch(&mut self, kind: EntityKind) -> Result<LoadedCollection>;
}

/// Exported JSON files in a data directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    files: InputFiles,
}

impl DirectorySource {
    /// Opens a data directory; all three collection files must exist.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            files: locate_inputs(data_dir)?,
        })
    }

    pub fn files(&self) -> &InputFiles {
        &self.files
    }
}

impl RecordSource for DirectorySource {
    fn describe(&self) -> String {
        match self.files.courses.parent() {
            Some(dir) => dir.display().to_string(),
            None => self.files.courses.display().to_string(),
        }
    }

    fn fetch(&mut self, kind: EntityKind) -> Result<LoadedCollection> {
        read_collection(self.files.path(kind), kind)
    }
}

/// Reads one collection file.
///
/// A file holding a page whose `paging.nextPage` is set was cut off by the
/// exporter; the records present are kept and the collection is marked
/// truncated.
pub fn read_collection(path: &Path, kind: EntityKind) -> Result<LoadedCollection> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => IngestError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let sha256 = sha256_hex(&bytes);
    let payload: Value = serde_json::from_slice(&bytes).map_err(|source| IngestError::JsonParse {
        path: path.to_path_buf(),
        source,
    })?;
    let page = parse_page(path, payload)?;
    let truncated = match &page.next_page {
        Some(next) => {
            warn!(
                path = %path.display(),
                next_page = %next,
                "export has further pages that are not available offline"
            );
            true
        }
        None => false,
    };
    let records = unwrap_pages([page]);
    debug!(
        collection = kind.collection_name(),
        path = %path.display(),
        records = records.len(),
        sha256 = %sha256,
        "read collection"
    );
    Ok(LoadedCollection {
        kind,
        info: SourceInfo {
            origin: path.display().to_string(),
            records: records.len(),
            sha256,
            truncated,
        },
        records,
    })
}

/// Loads all three collections from a source, courses first.
pub fn load_inputs<S: RecordSource + ?Sized>(source: &mut S) -> Result<RawInputs> {
    let span = info_span!("load", source = %source.describe());
    let _guard = span.enter();
    let courses = source.fetch(EntityKind::Course)?;
    let users = source.fetch(EntityKind::User)?;
    let enrollments = source.fetch(EntityKind::Enrollment)?;
    info!(
        courses = courses.records.len(),
        users = users.records.len(),
        enrollments = enrollments.records.len(),
        "loaded inputs"
    );
    Ok(RawInputs {
        courses,
        users,
        enrollments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"[]"),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn test_read_collection_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("courses.json");
        std::fs::write(&path, "[]").unwrap();
        let loaded = read_collection(&path, EntityKind::Course).unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.info.records, 0);
        assert!(!loaded.info.truncated);
        assert_eq!(loaded.info.sha256, sha256_hex(b"[]"));
    }

    #[test]
    fn test_read_collection_truncated_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"{"results": [{"id": "_u1_1"}], "paging": {"nextPage": "/users?offset=1"}}"#,
        )
        .unwrap();
        let loaded = read_collection(&path, EntityKind::User).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.info.truncated);
    }

    #[test]
    fn test_read_collection_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            read_collection(&path, EntityKind::User),
            Err(IngestError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_read_collection_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        assert!(matches!(
            read_collection(&path, EntityKind::User),
            Err(IngestError::FileNotFound { .. })
        ));
    }
}
