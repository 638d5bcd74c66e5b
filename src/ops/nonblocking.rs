//! Async filesystem operations on top of `tokio::fs`
//!
//! Behaviour and errors match [`super::blocking`] one for one.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::fs;

use super::blocking::{self, non_empty_parent};
use super::{OpsError, format_timestamp};

type Result<T> = std::result::Result<T, OpsError>;

/// See [`blocking::create_directory`].
///
/// # Errors
/// Returns `OpsError::CreateFailed` if the directory cannot be created.
pub async fn create_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path)
        .await
        .map_err(|e| OpsError::create(path, e))?;
    tracing::debug!(path = %path.display(), "created directory");
    Ok(())
}

/// See [`blocking::read_text_file`].
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `ReadFailed`.
pub async fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .await
        .map_err(|e| OpsError::read(path, e))
}

/// See [`blocking::write_text_file`]. The returned future resolves once the
/// data is written.
///
/// # Errors
/// Returns `OpsError::WriteFailed`.
pub async fn write_text_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OpsError::write(path, e))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|e| OpsError::write(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// See [`blocking::copy_file`].
///
/// # Errors
/// Returns `OpsError::CopyFailed`.
pub async fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    if let Some(parent) = non_empty_parent(dest) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| OpsError::copy(src, dest, e))?;
    }
    let bytes = fs::copy(src, dest)
        .await
        .map_err(|e| OpsError::copy(src, dest, e))?;
    tracing::debug!(from = %src.display(), to = %dest.display(), bytes, "copied file");
    Ok(bytes)
}

/// See [`blocking::copy_directory`]; runs on the blocking thread pool.
///
/// # Errors
/// Returns `OpsError::CopyFailed`.
pub async fn copy_directory(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let (src, dest) = (src.as_ref().to_path_buf(), dest.as_ref().to_path_buf());
    let (task_src, task_dest) = (src.clone(), dest.clone());
    tokio::task::spawn_blocking(move || blocking::copy_directory(task_src, task_dest))
        .await
        .map_err(|e| OpsError::copy(&src, &dest, e))?
}

/// See [`blocking::remove_path`].
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `RemoveFailed`.
pub async fn remove_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path)
        .await
        .map_err(|e| OpsError::remove(path, e))?;
    let removal = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removal.map_err(|e| OpsError::remove(path, e))?;
    tracing::debug!(path = %path.display(), "removed");
    Ok(())
}

/// See [`blocking::delete_file`].
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `RemoveFailed`.
pub async fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::remove_file(path)
        .await
        .map_err(|e| OpsError::remove(path, e))?;
    tracing::debug!(path = %path.display(), "deleted file");
    Ok(())
}

/// See [`blocking::clear_directory`].
///
/// # Errors
/// Returns `NotADirectory` if `path` is a file, or the first removal error.
pub async fn clear_directory(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(OpsError::io(path, e)),
    };
    if !meta.is_dir() {
        return Err(OpsError::NotADirectory(path.to_path_buf()));
    }

    let mut removed = 0;
    let mut reader = fs::read_dir(path).await.map_err(|e| OpsError::io(path, e))?;
    while let Some(entry) = reader.next_entry().await.map_err(|e| OpsError::io(path, e))? {
        let child = entry.path();
        let is_dir = entry
            .file_type()
            .await
            .map_err(|e| OpsError::io(&child, e))?
            .is_dir();
        let removal = if is_dir {
            fs::remove_dir_all(&child).await
        } else {
            fs::remove_file(&child).await
        };
        removal.map_err(|e| OpsError::remove(&child, e))?;
        removed += 1;
    }
    tracing::debug!(path = %path.display(), removed, "cleared directory");
    Ok(removed)
}

/// See [`blocking::modified_at`].
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `Io`.
pub async fn modified_at(path: impl AsRef<Path>) -> Result<DateTime<Utc>> {
    modified(path.as_ref()).await.map(DateTime::<Utc>::from)
}

/// See [`blocking::last_modified_time`].
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `Io`.
pub async fn last_modified_time(path: impl AsRef<Path>) -> Result<String> {
    modified(path.as_ref()).await.map(format_timestamp)
}

async fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .map_err(|e| OpsError::io(path, e))
}

/// See [`blocking::is_directory`].
pub async fn is_directory(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).await.is_ok_and(|meta| meta.is_dir())
}

/// See [`blocking::is_file`].
pub async fn is_file(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}
