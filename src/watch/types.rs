use std::path::PathBuf;
use std::time::Duration;

use notify_debouncer_mini::DebouncedEventKind;
use thiserror::Error;

/// Default quiet period before a burst of changes is reported
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Tuning for [`super::watch_paths`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl WatchOptions {
    #[must_use]
    pub const fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

/// How a debounced change was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// One or more changes settled within the debounce window
    Any,
    /// The path kept changing for longer than the debounce window
    Continuous,
}

impl From<DebouncedEventKind> for ChangeKind {
    fn from(kind: DebouncedEventKind) -> Self {
        match kind {
            DebouncedEventKind::AnyContinuous => Self::Continuous,
            _ => Self::Any,
        }
    }
}

/// A path under a watched root changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The watched root this change belongs to
    pub root: PathBuf,
    /// The path that changed, as reported by the OS
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Item delivered by a [`super::WatchHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed(ChangeEvent),
    /// Watching `root` failed or reported an error; other roots are unaffected
    Error { root: PathBuf, message: String },
}

impl WatchEvent {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Errors produced while setting up watchers
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to watch {}: {source}", root.display())]
    Notify {
        root: PathBuf,
        #[source]
        source: notify::Error,
    },
}
