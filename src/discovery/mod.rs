//! Recursive, extension-filtered file discovery
//!
//! A [`DiscoveryRequest`] names one or more roots and a set of accepted
//! extensions. [`FileFinder::find`] walks every root (depth unbounded) and
//! returns each regular file whose final path segment has exactly one
//! extension from the set. Directories are never returned, even when their
//! name looks like `build.js`.
//!
//! # Failure policy
//!
//! With [`FailurePolicy::Lenient`] (the default) a root that is missing, is
//! not a directory or cannot be read is dropped as a whole: nothing found
//! under it is kept, a [`Diagnostic::RootSkipped`] is emitted and the failure
//! is listed in [`DiscoveryResult::skipped`]. The remaining roots are still
//! searched. [`FailurePolicy::Strict`] returns the first failure instead.
//!
//! # Examples
//! ```no_run
//! use fsops::discovery::{DiscoveryRequest, FileFinder};
//!
//! let request = DiscoveryRequest::new(["src", "tests"], ["rs"]).unwrap();
//! let result = FileFinder::new().find(&request).unwrap();
//! for path in result.paths() {
//!     println!("{}", path.display());
//! }
//! ```

mod error;
mod extension;
mod nonblocking;
mod traits;

pub use error::DiscoveryError;
pub use extension::{ExtensionSet, split_single_extension};
pub use traits::{Entry, EntryKind, EntrySource, OsEntrySource};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostics::{self, Diagnostic, DiagnosticSink};

/// Roots and accepted extensions for one discovery call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    roots: Vec<PathBuf>,
    extensions: ExtensionSet,
}

impl DiscoveryRequest {
    /// Create a validated request.
    ///
    /// # Errors
    /// Returns `DiscoveryError::InvalidArgument` when `roots` is empty or the
    /// extensions are rejected by [`ExtensionSet::new`]. No filesystem access
    /// happens here.
    pub fn new<R, P, E, S>(roots: R, extensions: E) -> Result<Self, DiscoveryError>
    where
        R: IntoIterator<Item = P>,
        P: Into<PathBuf>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
        if roots.is_empty() {
            return Err(DiscoveryError::invalid("no roots given"));
        }
        if let Some(empty) = roots.iter().find(|r| r.as_os_str().is_empty()) {
            return Err(DiscoveryError::invalid(format!("empty root path {empty:?}")));
        }
        let extensions = ExtensionSet::new(extensions)?;
        Ok(Self { roots, extensions })
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub const fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }
}

/// A root that was left out of a lenient discovery
#[derive(Debug)]
pub struct RootFailure {
    pub root: PathBuf,
    pub error: DiscoveryError,
}

/// Matching file paths, in root order then traversal order
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    paths: Vec<PathBuf>,
    skipped: Vec<RootFailure>,
}

impl DiscoveryResult {
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }

    /// Roots that were skipped under [`FailurePolicy::Lenient`]
    #[must_use]
    pub fn skipped(&self) -> &[RootFailure] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl IntoIterator for DiscoveryResult {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

/// What to do when a root cannot be traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Skip the failing root, report it, keep going
    #[default]
    Lenient,
    /// Abort the whole call on the first failing root
    Strict,
}

/// Walks roots and collects files with an accepted extension
pub struct FileFinder<S = OsEntrySource> {
    source: S,
    policy: FailurePolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl FileFinder<OsEntrySource> {
    /// Finder over the host filesystem, lenient, reporting through `tracing`
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(OsEntrySource)
    }
}

impl Default for FileFinder<OsEntrySource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntrySource> FileFinder<S> {
    /// Finder over an arbitrary [`EntrySource`]
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            policy: FailurePolicy::default(),
            sink: diagnostics::default_sink(),
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// The entry source this finder reads from
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Run a discovery against the finder's source.
    ///
    /// # Errors
    /// Under [`FailurePolicy::Strict`], returns the first root failure
    /// (`NotFound`, `NotADirectory`, `PermissionDenied` or `Io`). Under
    /// [`FailurePolicy::Lenient`] this never fails.
    pub fn find(&self, request: &DiscoveryRequest) -> Result<DiscoveryResult, DiscoveryError> {
        let mut result = DiscoveryResult::default();
        for root in request.roots() {
            let outcome = self.scan_root(root, request.extensions());
            self.settle(root, outcome, &mut result)?;
        }
        Ok(result)
    }

    fn scan_root(&self, root: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>, DiscoveryError> {
        let kind = self
            .source
            .stat(root)
            .map_err(|e| DiscoveryError::from_io(root, e))?;
        if kind != EntryKind::Directory {
            return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
        }

        let mut matches = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let entries = self
                .source
                .list_entries(&dir)
                .map_err(|e| DiscoveryError::from_io(&dir, e))?;
            let mut subdirs = Vec::new();
            for entry in entries {
                if let Some(subdir) = collect_entry(entry, extensions, &mut matches) {
                    subdirs.push(subdir);
                }
            }
            // Reversed so the first listed subdirectory is walked first
            pending.extend(subdirs.into_iter().rev());
        }
        Ok(matches)
    }
}

impl<S> FileFinder<S> {
    /// Fold one root's outcome into `result` according to the policy
    fn settle(
        &self,
        root: &Path,
        outcome: Result<Vec<PathBuf>, DiscoveryError>,
        result: &mut DiscoveryResult,
    ) -> Result<(), DiscoveryError> {
        match outcome {
            Ok(paths) => {
                self.sink.emit(&Diagnostic::RootScanned {
                    root: root.to_path_buf(),
                    matches: paths.len(),
                });
                result.paths.extend(paths);
                Ok(())
            }
            Err(error) if self.policy == FailurePolicy::Strict => Err(error),
            Err(error) => {
                self.sink.emit(&Diagnostic::RootSkipped {
                    root: root.to_path_buf(),
                    reason: error.to_string(),
                });
                result.skipped.push(RootFailure {
                    root: root.to_path_buf(),
                    error,
                });
                Ok(())
            }
        }
    }
}

/// Route one listed entry: matching files go to `matches`, walkable
/// directories are handed back to the caller.
fn collect_entry(entry: Entry, extensions: &ExtensionSet, matches: &mut Vec<PathBuf>) -> Option<PathBuf> {
    match entry.kind {
        EntryKind::Directory if !entry.is_link => Some(entry.path),
        EntryKind::File if extensions.matches(&entry.path) => {
            matches.push(entry.path);
            None
        }
        _ => None,
    }
}
