use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while validating or running a discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Malformed request; raised before any filesystem access
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Root (or an entry below it) does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Root refers to something that is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// An entry could not be read
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    /// Any other I/O failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DiscoveryError {
    /// Classify an I/O error raised while touching `path`
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    #[must_use]
    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidArgument(detail.into())
    }
}
