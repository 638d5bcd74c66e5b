use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a directory entry turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, fifos, dangling links and the like
    Other,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Set when the entry is a symbolic link; linked directories are not descended into
    pub is_link: bool,
}

/// Read-only view of a filesystem used by discovery
pub trait EntrySource {
    /// Classify the object at `path`, following links.
    ///
    /// # Errors
    /// Returns the underlying `io::Error` if `path` cannot be inspected.
    fn stat(&self, path: &Path) -> io::Result<EntryKind>;

    /// List the immediate children of `dir`, in the order the source yields them.
    ///
    /// # Errors
    /// Returns the underlying `io::Error` if `dir` cannot be read.
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<Entry>>;
}

/// The host filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntrySource;

pub(crate) fn kind_of(meta: &fs::Metadata) -> EntryKind {
    if meta.is_dir() {
        EntryKind::Directory
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

pub(crate) fn kind_of_type(file_type: fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl EntrySource for OsEntrySource {
    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        fs::metadata(path).map(|meta| kind_of(&meta))
    }

    fn list_entries(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            let is_link = file_type.is_symlink();
            let kind = if is_link {
                // Dangling links are not an error, they just never match
                fs::metadata(&path).map_or(EntryKind::Other, |meta| kind_of(&meta))
            } else {
                kind_of_type(file_type)
            };
            entries.push(Entry { path, kind, is_link });
        }
        Ok(entries)
    }
}
