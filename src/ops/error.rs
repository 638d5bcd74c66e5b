//! Error types for filesystem operations
//!
//! Every variant carries the path that failed. Copy failures collapse into a
//! single `CopyFailed` kind whatever the underlying cause; write failures are
//! always surfaced as `WriteFailed` so a lost write can't go unnoticed.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Filesystem operation errors
#[derive(Debug, Error)]
pub enum OpsError {
    /// Path does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The host refused access
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Copying a file or directory failed
    #[error("Failed to copy '{}' to '{}': {reason}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Writing a file (or creating its parent) failed
    #[error("Failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a file failed
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating a directory failed
    #[error("Failed to create '{}': {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removing a file or directory failed
    #[error("Failed to remove '{}': {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

type Fallback = fn(PathBuf, io::Error) -> OpsError;

impl OpsError {
    /// Map `NotFound` and `PermissionDenied` to their own variants, anything
    /// else through `fallback`
    pub(crate) fn classify(path: &Path, err: io::Error, fallback: Fallback) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path.to_path_buf()),
            _ => fallback(path.to_path_buf(), err),
        }
    }

    pub(crate) fn read(path: &Path, err: io::Error) -> Self {
        Self::classify(path, err, |path, source| Self::ReadFailed { path, source })
    }

    pub(crate) fn remove(path: &Path, err: io::Error) -> Self {
        Self::classify(path, err, |path, source| Self::RemoveFailed { path, source })
    }

    pub(crate) fn io(path: &Path, err: io::Error) -> Self {
        Self::classify(path, err, |path, source| Self::Io { path, source })
    }

    pub(crate) fn write(path: &Path, err: io::Error) -> Self {
        Self::WriteFailed {
            path: path.to_path_buf(),
            source: err,
        }
    }

    pub(crate) fn create(path: &Path, err: io::Error) -> Self {
        Self::CreateFailed {
            path: path.to_path_buf(),
            source: err,
        }
    }

    pub(crate) fn copy(from: &Path, to: &Path, reason: impl ToString) -> Self {
        Self::CopyFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_classify_not_found() {
        let err = OpsError::read(Path::new("x.txt"), io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, OpsError::NotFound(p) if p == Path::new("x.txt")));
    }

    #[test]
    fn test_classify_falls_back() {
        let err = OpsError::remove(Path::new("x"), io::Error::other("busy"));
        assert!(matches!(err, OpsError::RemoveFailed { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_write_never_reclassified() {
        let err = OpsError::write(
            Path::new("locked.txt"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, OpsError::WriteFailed { .. }));
    }

    #[test]
    fn test_copy_failed_display() {
        let err = OpsError::copy(Path::new("a"), Path::new("b"), "disk full");
        assert_eq!(err.to_string(), "Failed to copy 'a' to 'b': disk full");
        assert!(err.source().is_none());
    }
}
