//! Async discovery over the host filesystem
//!
//! Same walk as [`FileFinder::find`], but every directory read goes through
//! `tokio::fs`, so the future only yields at filesystem boundaries.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::traits::{kind_of, kind_of_type};
use super::{
    DiscoveryError, DiscoveryRequest, DiscoveryResult, Entry, EntryKind, ExtensionSet, FileFinder,
    OsEntrySource, collect_entry,
};

impl FileFinder<OsEntrySource> {
    /// Non-blocking counterpart of [`FileFinder::find`].
    ///
    /// # Errors
    /// Same as [`FileFinder::find`].
    pub async fn find_async(&self, request: &DiscoveryRequest) -> Result<DiscoveryResult, DiscoveryError> {
        let mut result = DiscoveryResult::default();
        for root in request.roots() {
            let outcome = scan_root(root, request.extensions()).await;
            self.settle(root, outcome, &mut result)?;
        }
        Ok(result)
    }
}

async fn scan_root(root: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>, DiscoveryError> {
    let meta = fs::metadata(root)
        .await
        .map_err(|e| DiscoveryError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    let mut matches = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut reader = fs::read_dir(&dir)
            .await
            .map_err(|e| DiscoveryError::from_io(&dir, e))?;
        let mut subdirs = Vec::new();
        while let Some(dir_entry) = reader
            .next_entry()
            .await
            .map_err(|e| DiscoveryError::from_io(&dir, e))?
        {
            let entry = read_entry(dir_entry).await?;
            if let Some(subdir) = collect_entry(entry, extensions, &mut matches) {
                subdirs.push(subdir);
            }
        }
        pending.extend(subdirs.into_iter().rev());
    }
    Ok(matches)
}

async fn read_entry(dir_entry: fs::DirEntry) -> Result<Entry, DiscoveryError> {
    let path = dir_entry.path();
    let file_type = dir_entry
        .file_type()
        .await
        .map_err(|e| DiscoveryError::from_io(&path, e))?;
    let is_link = file_type.is_symlink();
    let kind = if is_link {
        fs::metadata(&path)
            .await
            .map_or(EntryKind::Other, |meta| kind_of(&meta))
    } else {
        kind_of_type(file_type)
    };
    Ok(Entry { path, kind, is_link })
}
