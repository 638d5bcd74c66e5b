//! Command-line interface definitions and parsing
//!
//! A thin `clap` front end over the library. Flags that are not given fall
//! back to the values in [`crate::config::FsOpsConfig`].
//!
//! # Commands
//!
//! - **find**: list files with an accepted extension under one or more roots
//! - **watch**: print changes under one or more roots until interrupted
//! - **mtime**: print a path's last modification time (ISO-8601)
//! - **stat**: print whether a path is a file, a directory or missing
//! - **mkdir**, **copy**, **rm**, **cat**, **write**: plain file chores

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::FsOpsConfig;
use crate::discovery::FailurePolicy;
use crate::watch::WatchOptions;

#[derive(Parser, Debug)]
#[command(name = "fsops")]
#[command(version, about = "Filesystem helpers: discovery, copy, remove, watch", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Find files with an accepted extension under the given roots
    #[command(visible_alias = "f")]
    Find {
        /// Directories to search
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Accepted extension, without the dot (repeatable)
        #[arg(short = 'e', long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Abort on the first root that cannot be read
        #[arg(long)]
        strict: bool,
    },

    /// Watch the given roots and print every change
    #[command(visible_alias = "w")]
    Watch {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Debounce window in milliseconds
        #[arg(long, value_name = "MS")]
        debounce_ms: Option<u64>,
    },

    /// Print the last modification time of a path
    Mtime { path: PathBuf },

    /// Print whether a path is a file, a directory, or missing
    Stat { path: PathBuf },

    /// Create a directory and its parents
    Mkdir { path: PathBuf },

    /// Copy a file or a directory tree
    Copy { src: PathBuf, dest: PathBuf },

    /// Remove a file or a directory tree
    Rm { path: PathBuf },

    /// Print a text file
    Cat { path: PathBuf },

    /// Write text to a file, creating parent directories
    Write { path: PathBuf, text: String },
}

impl Cli {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Quiet if either the flag or the config says so
    #[must_use]
    pub const fn is_quiet(&self, config: &FsOpsConfig) -> bool {
        self.quiet || config.quiet
    }

    /// Default log filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(&self, config: &FsOpsConfig) -> &'static str {
        if self.is_quiet(config) { "fsops=warn" } else { "fsops=info" }
    }
}

impl Commands {
    /// Extensions for `find`, falling back to the configured defaults
    #[must_use]
    pub fn find_extensions(&self, config: &FsOpsConfig) -> Vec<String> {
        match self {
            Self::Find { extensions, .. } if !extensions.is_empty() => extensions.clone(),
            _ => config.extensions.clone(),
        }
    }

    /// Failure policy for `find`: `--strict` wins, otherwise the config decides
    #[must_use]
    pub fn find_policy(&self, config: &FsOpsConfig) -> FailurePolicy {
        match self {
            Self::Find { strict: true, .. } => FailurePolicy::Strict,
            _ => config.failure_policy(),
        }
    }

    /// Watch options, `--debounce-ms` overriding the config
    #[must_use]
    pub fn watch_options(&self, config: &FsOpsConfig) -> WatchOptions {
        match self {
            Self::Watch {
                debounce_ms: Some(ms),
                ..
            } => WatchOptions::with_debounce(std::time::Duration::from_millis(*ms)),
            _ => config.watch_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fsops").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_find_with_extensions() {
        let cli = parse(&["find", "src", "lib", "-e", "js", "--ext", "ts"]);
        let config = FsOpsConfig::default();
        match &cli.command {
            Commands::Find { roots, .. } => {
                assert_eq!(roots, &vec![PathBuf::from("src"), PathBuf::from("lib")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.command.find_extensions(&config), vec!["js", "ts"]);
        assert_eq!(cli.command.find_policy(&config), FailurePolicy::Lenient);
    }

    #[test]
    fn test_find_falls_back_to_config() {
        let cli = parse(&["f", "src"]);
        let config = FsOpsConfig {
            extensions: vec!["rs".to_string()],
            strict: true,
            ..FsOpsConfig::default()
        };
        assert_eq!(cli.command.find_extensions(&config), vec!["rs"]);
        assert_eq!(cli.command.find_policy(&config), FailurePolicy::Strict);
    }

    #[test]
    fn test_find_requires_root() {
        assert!(Cli::try_parse_from(["fsops", "find"]).is_err());
    }

    #[test]
    fn test_watch_debounce_override() {
        let config = FsOpsConfig::default();
        let cli = parse(&["watch", "a", "--debounce-ms", "20"]);
        assert_eq!(
            cli.command.watch_options(&config).debounce,
            std::time::Duration::from_millis(20)
        );
        let cli = parse(&["watch", "a"]);
        assert_eq!(cli.command.watch_options(&config), config.watch_options());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["cat", "notes.txt", "-q", "--config", "/tmp/c.toml"]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(cli.is_quiet(&FsOpsConfig::default()));
    }

    #[test]
    fn test_quiet_config_lowers_log_filter() {
        let cli = parse(&["stat", "notes.txt"]);
        assert_eq!(cli.log_filter(&FsOpsConfig::default()), "fsops=info");

        let quiet = FsOpsConfig {
            quiet: true,
            ..FsOpsConfig::default()
        };
        assert_eq!(cli.log_filter(&quiet), "fsops=warn");
    }
}
