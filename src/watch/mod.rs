//! Change watching
//!
//! [`watch_paths`] starts one debounced, recursive watcher per root and
//! funnels everything into a single channel owned by the returned
//! [`WatchHandle`]. A root that cannot be watched shows up as a
//! [`WatchEvent::Error`] on that channel; the other roots keep going.
//! Dropping the handle stops every watcher.

mod types;

pub use types::{ChangeEvent, ChangeKind, WatchError, WatchEvent, WatchOptions};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::diagnostics::{Diagnostic, DiagnosticSink};

type Subscription = Debouncer<RecommendedWatcher>;

/// Live set of watchers plus the stream of their events
pub struct WatchHandle {
    subscriptions: Vec<(PathBuf, Subscription)>,
    events: UnboundedReceiver<WatchEvent>,
}

impl WatchHandle {
    /// Roots that are currently being watched
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.subscriptions.iter().map(|(root, _)| root.as_path())
    }

    /// Next event. Returns `None` once every watcher has stopped and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.events.recv().await
    }

    /// Blocking counterpart of [`WatchHandle::recv`].
    ///
    /// # Panics
    /// Panics if called from within an async runtime.
    pub fn blocking_recv(&mut self) -> Option<WatchEvent> {
        self.events.blocking_recv()
    }

    /// Next queued event, if any, without waiting
    pub fn try_recv(&mut self) -> Option<WatchEvent> {
        self.events.try_recv().ok()
    }

    /// Stop watching one root. Returns whether it was being watched.
    pub fn unwatch(&mut self, root: &Path) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(watched, _)| watched != root);
        before != self.subscriptions.len()
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("roots", &self.roots().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Watch every path in `paths` recursively.
///
/// # Errors
/// Returns `WatchError::InvalidArgument` if `paths` is empty. Failures on
/// individual roots are delivered as [`WatchEvent::Error`] instead.
pub fn watch_paths<P: AsRef<Path>>(
    paths: &[P],
    options: &WatchOptions,
    sink: Arc<dyn DiagnosticSink>,
) -> Result<WatchHandle, WatchError> {
    if paths.is_empty() {
        return Err(WatchError::InvalidArgument("no paths to watch".to_string()));
    }

    let (tx, events) = mpsc::unbounded_channel();
    let mut subscriptions = Vec::with_capacity(paths.len());

    for path in paths {
        let root = path.as_ref().to_path_buf();
        match subscribe(&root, options, &tx, &sink) {
            Ok(subscription) => {
                sink.emit(&Diagnostic::WatchStarted { root: root.clone() });
                subscriptions.push((root, subscription));
            }
            Err(err) => {
                let message = err.to_string();
                sink.emit(&Diagnostic::WatchFailed {
                    root: root.clone(),
                    reason: message.clone(),
                });
                let _ = tx.send(WatchEvent::Error { root, message });
            }
        }
    }

    Ok(WatchHandle {
        subscriptions,
        events,
    })
}

fn subscribe(
    root: &Path,
    options: &WatchOptions,
    tx: &UnboundedSender<WatchEvent>,
    sink: &Arc<dyn DiagnosticSink>,
) -> Result<Subscription, WatchError> {
    let tx = tx.clone();
    let sink = Arc::clone(sink);
    let base = root.to_path_buf();

    let mut debouncer = new_debouncer(options.debounce, move |result: DebounceEventResult| match result {
        Ok(events) => {
            for event in events {
                tracing::debug!(path = %event.path.display(), "changed");
                let change = ChangeEvent {
                    root: base.clone(),
                    kind: ChangeKind::from(event.kind),
                    path: event.path,
                };
                // Receiver gone means the handle was dropped
                if tx.send(WatchEvent::Changed(change)).is_err() {
                    return;
                }
            }
        }
        Err(err) => {
            let message = err.to_string();
            sink.emit(&Diagnostic::WatchFailed {
                root: base.clone(),
                reason: message.clone(),
            });
            let _ = tx.send(WatchEvent::Error {
                root: base.clone(),
                message,
            });
        }
    })
    .map_err(|source| WatchError::Notify {
        root: root.to_path_buf(),
        source,
    })?;

    debouncer
        .watcher()
        .watch(root, RecursiveMode::Recursive)
        .map_err(|source| WatchError::Notify {
            root: root.to_path_buf(),
            source,
        })?;

    Ok(debouncer)
}
