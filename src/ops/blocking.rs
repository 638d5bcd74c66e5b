//! Blocking filesystem operations

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use fs_extra::dir::CopyOptions;

use super::{OpsError, format_timestamp};

type Result<T> = std::result::Result<T, OpsError>;

/// Create `path` and any missing parents. Succeeds if it already exists.
///
/// # Errors
/// Returns `OpsError::CreateFailed` if the directory cannot be created, for
/// example because a file is in the way.
pub fn create_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| OpsError::create(path, e))?;
    tracing::debug!(path = %path.display(), "created directory");
    Ok(())
}

/// Read a UTF-8 text file.
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `ReadFailed` (which also covers
/// invalid UTF-8).
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| OpsError::read(path, e))
}

/// Write `contents` to `path`, creating the parent directory first.
///
/// The write has completed when this returns.
///
/// # Errors
/// Returns `OpsError::WriteFailed` if the parent cannot be created or the
/// file cannot be written.
pub fn write_text_file(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent).map_err(|e| OpsError::write(path, e))?;
    }
    fs::write(path, contents).map_err(|e| OpsError::write(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Copy a single file, creating the destination's parent if needed.
/// Returns the number of bytes copied.
///
/// # Errors
/// Returns `OpsError::CopyFailed` on any failure.
pub fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    if let Some(parent) = non_empty_parent(dest) {
        fs::create_dir_all(parent).map_err(|e| OpsError::copy(src, dest, e))?;
    }
    let bytes = fs::copy(src, dest).map_err(|e| OpsError::copy(src, dest, e))?;
    tracing::debug!(from = %src.display(), to = %dest.display(), bytes, "copied file");
    Ok(bytes)
}

/// Recursively copy the contents of `src` into `dest`, so that `dest` ends up
/// mirroring `src`. Existing files in `dest` are overwritten.
///
/// # Errors
/// Returns `OpsError::CopyFailed` on any failure, including `src` missing or
/// not being a directory.
pub fn copy_directory(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    if !src.is_dir() {
        return Err(OpsError::copy(src, dest, "source is not a directory"));
    }

    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.copy_inside = true;
    options.content_only = true;

    fs::create_dir_all(dest).map_err(|e| OpsError::copy(src, dest, e))?;
    let bytes = fs_extra::dir::copy(src, dest, &options).map_err(|e| OpsError::copy(src, dest, e))?;
    tracing::debug!(from = %src.display(), to = %dest.display(), bytes, "copied directory");
    Ok(bytes)
}

/// Remove a file, or a directory with everything below it.
///
/// # Errors
/// Returns `NotFound` if nothing exists at `path`, otherwise `RemoveFailed`
/// or `PermissionDenied`.
pub fn remove_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path).map_err(|e| OpsError::remove(path, e))?;
    let removal = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removal.map_err(|e| OpsError::remove(path, e))?;
    tracing::debug!(path = %path.display(), "removed");
    Ok(())
}

/// Delete a single file.
///
/// # Errors
/// Returns `NotFound` if the file does not exist, otherwise `RemoveFailed`
/// or `PermissionDenied`.
pub fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::remove_file(path).map_err(|e| OpsError::remove(path, e))?;
    tracing::debug!(path = %path.display(), "deleted file");
    Ok(())
}

/// Remove everything inside `path` but keep the directory itself.
/// A missing directory is left alone. Returns how many top-level entries
/// were removed.
///
/// # Errors
/// Returns `NotADirectory` if `path` is a file, or the first removal error.
pub fn clear_directory(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(OpsError::io(path, e)),
    };
    if !meta.is_dir() {
        return Err(OpsError::NotADirectory(path.to_path_buf()));
    }

    let mut removed = 0;
    for entry in fs::read_dir(path).map_err(|e| OpsError::io(path, e))? {
        let entry = entry.map_err(|e| OpsError::io(path, e))?;
        let child = entry.path();
        let is_dir = entry
            .file_type()
            .map_err(|e| OpsError::io(&child, e))?
            .is_dir();
        let removal = if is_dir {
            fs::remove_dir_all(&child)
        } else {
            fs::remove_file(&child)
        };
        removal.map_err(|e| OpsError::remove(&child, e))?;
        removed += 1;
    }
    tracing::debug!(path = %path.display(), removed, "cleared directory");
    Ok(removed)
}

/// Last modification time of `path`.
///
/// # Errors
/// Returns `NotFound`, `PermissionDenied` or `Io`.
pub fn modified_at(path: impl AsRef<Path>) -> Result<DateTime<Utc>> {
    modified(path.as_ref()).map(DateTime::<Utc>::from)
}

/// Last modification time of `path` as an ISO-8601 UTC string.
///
/// # Errors
/// Same as [`modified_at`].
pub fn last_modified_time(path: impl AsRef<Path>) -> Result<String> {
    modified(path.as_ref()).map(format_timestamp)
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| OpsError::io(path, e))
}

/// `true` if `path` is a directory (following links). Never fails.
#[must_use]
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

/// `true` if `path` itself is a regular file (links are not followed).
/// Never fails.
#[must_use]
pub fn is_file(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_file())
}

/// `path` itself when it is a directory, otherwise the directory containing it.
///
/// # Errors
/// Returns `NotFound` if `path` does not exist.
pub fn parent_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path).map_err(|e| OpsError::io(path, e))?;
    if meta.is_dir() {
        return Ok(path.to_path_buf());
    }
    Ok(path.parent().map(Path::to_path_buf).unwrap_or_default())
}

pub(super) fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTree;

    #[test]
    fn test_create_directory_is_idempotent() {
        let tree = TestTree::new();
        let target = tree.path("a/b/c");
        create_directory(&target).unwrap();
        create_directory(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_create_directory_over_file_fails() {
        let tree = TestTree::new();
        let file = tree.file("taken");
        let err = create_directory(&file).unwrap_err();
        assert!(matches!(err, OpsError::CreateFailed { .. }));
    }

    #[test]
    fn test_write_creates_parent_and_completes_before_return() {
        let tree = TestTree::new();
        let target = tree.path("nested/dir/out.txt");
        write_text_file(&target, "hello").unwrap();
        assert_eq!(read_text_file(&target).unwrap(), "hello");
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let tree = TestTree::new();
        tree.file("blocker");
        let err = write_text_file(tree.path("blocker/out.txt"), "x").unwrap_err();
        assert!(matches!(err, OpsError::WriteFailed { .. }));
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let tree = TestTree::new();
        let err = read_text_file(tree.path("missing.txt")).unwrap_err();
        assert!(matches!(err, OpsError::NotFound(_)));
    }

    #[test]
    fn test_copy_file_creates_parent() {
        let tree = TestTree::new();
        let src = tree.file_with_content("src.txt", "payload");
        let dest = tree.path("out/deeper/dest.txt");
        let bytes = copy_file(&src, &dest).unwrap();
        assert_eq!(bytes, 7);
        assert_eq!(read_text_file(&dest).unwrap(), "payload");
    }

    #[test]
    fn test_copy_file_missing_source_is_copy_failed() {
        let tree = TestTree::new();
        let err = copy_file(tree.path("nope"), tree.path("dest")).unwrap_err();
        assert!(matches!(err, OpsError::CopyFailed { .. }));
    }

    #[test]
    fn test_copy_directory_mirrors_contents() {
        let tree = TestTree::new();
        tree.file_with_content("src/a.txt", "a");
        tree.file_with_content("src/sub/b.txt", "b");
        tree.dir("src/empty");
        tree.file_with_content("dest/a.txt", "stale");

        copy_directory(tree.path("src"), tree.path("dest")).unwrap();

        assert_eq!(read_text_file(tree.path("dest/a.txt")).unwrap(), "a");
        assert_eq!(read_text_file(tree.path("dest/sub/b.txt")).unwrap(), "b");
        assert!(tree.path("dest/empty").is_dir());
        assert!(!tree.path("dest/src").exists());
    }

    #[test]
    fn test_copy_directory_into_new_nested_dest() {
        let tree = TestTree::new();
        tree.file("src/a.txt");
        copy_directory(tree.path("src"), tree.path("x/y/z")).unwrap();
        assert!(tree.path("x/y/z/a.txt").is_file());
    }

    #[test]
    fn test_copy_directory_from_file_is_copy_failed() {
        let tree = TestTree::new();
        let file = tree.file("file.txt");
        let err = copy_directory(&file, tree.path("dest")).unwrap_err();
        assert!(matches!(err, OpsError::CopyFailed { .. }));
    }

    #[test]
    fn test_remove_path_handles_files_and_trees() {
        let tree = TestTree::new();
        let file = tree.file("f.txt");
        tree.file("d/e/g.txt");

        remove_path(&file).unwrap();
        remove_path(tree.path("d")).unwrap();

        assert!(!file.exists());
        assert!(!tree.path("d").exists());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let tree = TestTree::new();
        let err = remove_path(tree.path("ghost")).unwrap_err();
        assert!(matches!(err, OpsError::NotFound(_)));
    }

    #[test]
    fn test_delete_file() {
        let tree = TestTree::new();
        let file = tree.file("f.txt");
        delete_file(&file).unwrap();
        assert!(!file.exists());
        assert!(matches!(delete_file(&file).unwrap_err(), OpsError::NotFound(_)));
    }

    #[test]
    fn test_delete_file_on_directory_fails() {
        let tree = TestTree::new();
        let dir = tree.dir("d");
        assert!(delete_file(&dir).is_err());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_clear_directory_keeps_root() {
        let tree = TestTree::new();
        tree.file("root/a.txt");
        tree.file("root/sub/b.txt");

        let removed = clear_directory(tree.path("root")).unwrap();

        assert_eq!(removed, 2);
        assert!(tree.path("root").is_dir());
        assert_eq!(fs::read_dir(tree.path("root")).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_missing_directory_is_noop() {
        let tree = TestTree::new();
        assert_eq!(clear_directory(tree.path("missing")).unwrap(), 0);
    }

    #[test]
    fn test_clear_directory_on_file() {
        let tree = TestTree::new();
        let file = tree.file("f");
        assert!(matches!(
            clear_directory(&file).unwrap_err(),
            OpsError::NotADirectory(_)
        ));
    }

    #[test]
    fn test_last_modified_time_is_iso() {
        let tree = TestTree::new();
        let file = tree.file("f.txt");
        let stamp = last_modified_time(&file).unwrap();
        assert!(stamp.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(&stamp).unwrap();
        let typed = modified_at(&file).unwrap();
        assert_eq!(parsed.timestamp_millis(), typed.timestamp_millis());
    }

    #[test]
    fn test_last_modified_missing() {
        let tree = TestTree::new();
        assert!(matches!(
            last_modified_time(tree.path("missing")).unwrap_err(),
            OpsError::NotFound(_)
        ));
    }

    #[test]
    fn test_is_directory_and_is_file_never_fail() {
        let tree = TestTree::new();
        let file = tree.file("f.txt");
        let dir = tree.dir("d");
        let missing = tree.path("missing");

        assert!(is_directory(&dir));
        assert!(!is_directory(&file));
        assert!(!is_directory(&missing));
        assert!(is_file(&file));
        assert!(!is_file(&dir));
        assert!(!is_file(&missing));
    }

    #[test]
    fn test_parent_dir() {
        let tree = TestTree::new();
        let file = tree.file("d/f.txt");
        let dir = tree.path("d");
        assert_eq!(parent_dir(&file).unwrap(), dir);
        assert_eq!(parent_dir(&dir).unwrap(), dir);
        assert!(matches!(
            parent_dir(tree.path("missing")).unwrap_err(),
            OpsError::NotFound(_)
        ));
    }
}
