//! Extension matching
//!
//! A file name matches when it contains exactly one `.` that splits it into
//! a non-empty base and a non-empty extension. `archive.tar.gz`, `.gitignore`
//! and `Makefile` therefore never match, whatever the accepted set contains.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

use super::error::DiscoveryError;

const SEPARATOR: char = '.';
const FORBIDDEN: &[char] = &['.', '*', '?', '[', ']', '/', '\\'];

/// Split a file name into `(base, extension)` if it has exactly one separator
/// with text on both sides.
#[must_use]
pub fn split_single_extension(name: &str) -> Option<(&str, &str)> {
    let (base, ext) = name.split_once(SEPARATOR)?;
    if base.is_empty() || ext.is_empty() || ext.contains(SEPARATOR) {
        return None;
    }
    Some((base, ext))
}

/// Byte-level counterpart of [`split_single_extension`] for OS file names.
///
/// Only the extension has to be valid UTF-8; the base may hold any bytes
/// the platform allows.
fn split_os_extension(name: &OsStr) -> Option<&str> {
    let bytes = name.as_encoded_bytes();
    let dot = bytes.iter().position(|&b| b == b'.')?;
    let (base, ext) = (&bytes[..dot], &bytes[dot + 1..]);
    if base.is_empty() || ext.is_empty() || ext.contains(&b'.') {
        return None;
    }
    std::str::from_utf8(ext).ok()
}

/// Validated, non-empty set of accepted extensions (case-sensitive, no dot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    inner: BTreeSet<String>,
}

impl ExtensionSet {
    /// Build a set from plain extension strings.
    ///
    /// # Errors
    /// Returns `DiscoveryError::InvalidArgument` if no extensions are given,
    /// or if any of them is empty, starts with or contains a dot, a path
    /// separator or a wildcard.
    pub fn new<I, S>(extensions: I) -> Result<Self, DiscoveryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = BTreeSet::new();
        for ext in extensions {
            let ext = ext.into();
            if ext.is_empty() {
                return Err(DiscoveryError::invalid("empty extension"));
            }
            if ext.contains(FORBIDDEN) {
                return Err(DiscoveryError::invalid(format!(
                    "extension '{ext}' must be a plain name without dots or wildcards"
                )));
            }
            inner.insert(ext);
        }
        if inner.is_empty() {
            return Err(DiscoveryError::invalid("extension set is empty"));
        }
        Ok(Self { inner })
    }

    #[must_use]
    pub fn contains(&self, ext: &str) -> bool {
        self.inner.contains(ext)
    }

    /// Whether the final segment of `path` matches this set
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(split_os_extension)
            .is_some_and(|ext| self.contains(ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
