//! Input discovery in a data directory.

use std::path::{Path, PathBuf};

use enroll_model::EntityKind;

use crate::error::{IngestError, Result};

/// Paths of the three collection files of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    pub courses: PathBuf,
    pub users: PathBuf,
    pub enrollments: PathBuf,
}

impl InputFiles {
    pub fn path(&self, kind: EntityKind) -> &Path {
        match kind {
            EntityKind::Course => &self.courses,
            EntityKind::User => &self.users,
            EntityKind::Enrollment => &self.enrollments,
        }
    }
}

/// Expected file for a collection: `<dir>/<courses|users|enrollments>.json`.
pub fn input_path(data_dir: &Path, kind: EntityKind) -> PathBuf {
    data_dir.join(format!("{}.json", kind.collection_name()))
}

/// Locates the three collection files, failing on the first one missing.
pub fn locate_inputs(data_dir: &Path) -> Result<InputFiles> {
    if !data_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: data_dir.to_path_buf(),
        });
    }
    let existing = |kind: EntityKind| -> Result<PathBuf> {
        let path = input_path(data_dir, kind);
        if path.is_file() {
            Ok(path)
        } else {
            Err(IngestError::FileNotFound { path })
        }
    };
    Ok(InputFiles {
        courses: existing(EntityKind::Course)?,
        users: existing(EntityKind::User)?,
        enrollments: existing(EntityKind::Enrollment)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "[]").unwrap();
        }
        dir
    }

    #[test]
    fn test_locate_inputs() {
        let dir = create_test_dir(&["courses.json", "users.json", "enrollments.json"]);
        let files = locate_inputs(dir.path()).unwrap();
        assert_eq!(files.courses, dir.path().join("courses.json"));
        assert_eq!(
            files.path(EntityKind::Enrollment),
            dir.path().join("enrollments.json")
        );
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = create_test_dir(&["courses.json", "enrollments.json"]);
        let err = locate_inputs(dir.path()).unwrap_err();
        match err {
            IngestError::FileNotFound { path } => {
                assert_eq!(path, dir.path().join("users.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let dir = create_test_dir(&[]);
        let missing = dir.path().join("nope");
        assert!(matches!(
            locate_inputs(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
