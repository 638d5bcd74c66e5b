//! fsops - small filesystem helpers with blocking and async flavours
//!
//! The centrepiece is [`discovery::FileFinder`], which walks one or more root
//! directories and returns every file whose name carries exactly one
//! extension from an accepted set. Around it sit thin wrappers for the usual
//! chores (directory creation, text reads and writes, copy, remove,
//! modification times) in [`ops`], and a debounced change watcher in
//! [`watch`].
//!
//! Nothing here resolves paths against the current working directory: every
//! path is used exactly as the caller supplies it.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod ops;
pub mod watch;

#[cfg(test)]
pub mod testing;

pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, TracingSink};
pub use discovery::{DiscoveryRequest, DiscoveryResult, FailurePolicy, FileFinder};
pub use watch::{ChangeEvent, WatchEvent, WatchHandle};

/// Error enum, contains all failure states of the library and binary
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// File discovery failed
    #[error("Discovery error: {0}")]
    Discovery(#[from] discovery::DiscoveryError),
    /// A filesystem operation failed
    #[error("Operation failed: {0}")]
    Ops(#[from] ops::OpsError),
    /// Setting up a watcher failed
    #[error("Watch error: {0}")]
    Watch(#[from] watch::WatchError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
