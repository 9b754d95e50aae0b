//! # Precondition Checks
//!
//! Existence checks for the files a command needs, run before any engine
//! call. Checks are evaluated in argument order and the first miss wins.

use std::path::{Path, PathBuf};

use mopro_core::{BridgeError, FileKind};

/// Require a regular file at `path`.
///
/// Returns the absolute form of `path`, which is what gets handed to the
/// engine. Directories and dangling symlinks count as missing.
pub fn require_file_exists(path: &Path, kind: FileKind) -> Result<PathBuf, BridgeError> {
    if !path.is_file() {
        tracing::debug!(kind = %kind, path = %path.display(), "required file missing");
        return Err(BridgeError::FileNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    Ok(absolute(path))
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_file_passes_and_stays_absolute() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved = require_file_exists(file.path(), FileKind::Zkey).unwrap();
        assert_eq!(resolved, file.path());
        assert!(resolved.is_absolute());
    }

    #[test]
    fn missing_file_reports_kind_and_path() {
        let err = require_file_exists(Path::new("/does/not/exist"), FileKind::Graph).unwrap_err();
        match err {
            BridgeError::FileNotFound { kind, path } => {
                assert_eq!(kind, FileKind::Graph);
                assert_eq!(path, Path::new("/does/not/exist"));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = require_file_exists(dir.path(), FileKind::Srs).unwrap_err();
        assert_eq!(err.code(), "FileNotFound");
    }
}
