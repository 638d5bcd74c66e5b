//! Testing utilities for fsops
//!
//! This module provides helpers for building throwaway directory trees on
//! disk and an in-memory [`EntrySource`] for discovery tests that should not
//! touch the filesystem at all.
//!
//! Only available when compiled with `cfg(test)`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::discovery::{Entry, EntryKind, EntrySource};

/// Temporary directory tree that is removed on drop
///
/// # Examples
/// ```ignore
/// let tree = TestTree::new();
/// tree.file("a/b.js");
/// tree.dir("a/sub.js");
/// assert!(tree.path("a/b.js").is_file());
/// ```
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the tree
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Create a file (and its parents) with default content
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn file(&self, relative: &str) -> PathBuf {
        self.file_with_content(relative, "test content")
    }

    /// # Panics
    /// Panics if the file cannot be written.
    pub fn file_with_content(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Create a directory (and its parents)
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("Failed to create test dir");
        path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort paths for order-independent comparisons
#[must_use]
pub fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

/// In-memory filesystem for discovery tests
///
/// Paths are stored verbatim; children of a directory are listed in the
/// order they were inserted. Every `list_entries` call is counted so tests
/// can assert that nothing was touched.
#[derive(Default)]
pub struct MemoryEntrySource {
    kinds: BTreeMap<PathBuf, EntryKind>,
    children: BTreeMap<PathBuf, Vec<PathBuf>>,
    denied: Vec<PathBuf>,
    calls: AtomicUsize,
}

impl MemoryEntrySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory and all of its ancestors
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.insert(PathBuf::from(path), EntryKind::Directory);
        self
    }

    /// Register a file and all of its ancestor directories
    #[must_use]
    pub fn file(mut self, path: &str) -> Self {
        self.insert(PathBuf::from(path), EntryKind::File);
        self
    }

    /// Make listing `path` fail with `PermissionDenied`
    #[must_use]
    pub fn deny(mut self, path: &str) -> Self {
        self.denied.push(PathBuf::from(path));
        self
    }

    /// Number of `list_entries` calls so far
    pub fn list_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn insert(&mut self, path: PathBuf, kind: EntryKind) {
        if self.kinds.contains_key(&path) {
            return;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.insert(parent.to_path_buf(), EntryKind::Directory);
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .push(path.clone());
        }
        self.kinds.insert(path, kind);
    }
}

impl EntrySource for MemoryEntrySource {
    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        self.kinds
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn list_entries(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.denied.iter().any(|d| d == dir) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        match self.kinds.get(dir) {
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(EntryKind::Directory) => {}
            Some(_) => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
        }
        Ok(self
            .children
            .get(dir)
            .into_iter()
            .flatten()
            .map(|path| Entry {
                path: path.clone(),
                kind: self.kinds[path],
                is_link: false,
            })
            .collect())
    }
}
