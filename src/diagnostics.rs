//! Diagnostic hook
//!
//! Discovery and watching report what they skip or start through a
//! [`DiagnosticSink`] instead of printing. The default sink forwards to
//! `tracing`; [`MemorySink`] keeps everything in memory so callers (and
//! tests) can inspect what happened.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Something worth telling the caller about that is not an error result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A discovery root was skipped because it could not be traversed
    RootSkipped { root: PathBuf, reason: String },
    /// A discovery root was traversed completely
    RootScanned { root: PathBuf, matches: usize },
    /// A watcher subscription was established for a root
    WatchStarted { root: PathBuf },
    /// A watcher failed to start or reported an error for a root
    WatchFailed { root: PathBuf, reason: String },
}

/// Receiver of [`Diagnostic`]s
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::RootSkipped { root, reason } => {
                tracing::warn!(root = %root.display(), %reason, "skipping discovery root");
            }
            Diagnostic::RootScanned { root, matches } => {
                tracing::debug!(root = %root.display(), matches, "scanned discovery root");
            }
            Diagnostic::WatchStarted { root } => {
                tracing::info!(root = %root.display(), "watching");
            }
            Diagnostic::WatchFailed { root, reason } => {
                tracing::warn!(root = %root.display(), %reason, "watch error");
            }
        }
    }
}

/// Records every diagnostic it receives
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of everything emitted so far
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Roots reported as skipped, in emission order
    #[must_use]
    pub fn skipped_roots(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::RootSkipped { root, .. } => Some(root),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(diagnostic.clone());
        }
    }
}

/// Shared handle to the default sink
#[must_use]
pub fn default_sink() -> Arc<dyn DiagnosticSink> {
    Arc::new(TracingSink)
}
