//! fsops CLI application entry point
//!
//! A thin command-line wrapper around the `fsops` library.
//!
//! # Usage
//!
//! ```bash
//! # List every .js and .ts file under two roots
//! fsops find src lib -e js -e ts
//!
//! # Fail instead of skipping a root that cannot be read
//! fsops find src missing --strict
//!
//! # Print changes until interrupted
//! fsops watch src
//!
//! # Chores
//! fsops mtime package.json
//! fsops copy assets dist/assets
//! fsops write out/notes.txt "hello"
//! ```
//!
//! # Configuration
//!
//! Defaults live in the user's config directory
//! (`~/.config/fsops/config.toml` on Linux) and are created on first run.
//! Log verbosity follows `RUST_LOG` (default `fsops=info`).

use fsops::{
    FsOpsError, WatchEvent,
    cli::{Cli, Commands},
    config::FsOpsConfig,
    diagnostics,
    discovery::{DiscoveryRequest, FileFinder},
    ops::nonblocking as ops,
    watch,
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, FsOpsError>;

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FsOpsConfig> {
    let config = match &cli.config {
        Some(path) => FsOpsConfig::load_from(path)?,
        None => FsOpsConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let result = match load_config(&cli) {
        Ok(config) => {
            init_tracing(cli.log_filter(&config));
            run(&cli, &config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, config: &FsOpsConfig) -> Result<()> {
    let quiet = cli.is_quiet(config);

    match &cli.command {
        Commands::Find { roots, .. } => {
            let request = DiscoveryRequest::new(roots.iter().cloned(), cli.command.find_extensions(config))?;
            let result = FileFinder::new()
                .policy(cli.command.find_policy(config))
                .find_async(&request)
                .await?;

            for path in result.paths() {
                println!("{}", path.display());
            }
            if !quiet && !result.skipped().is_empty() {
                eprintln!("Skipped {} root(s)", result.skipped().len());
            }
        }
        Commands::Watch { paths, .. } => {
            let options = cli.command.watch_options(config);
            let mut handle = watch::watch_paths(paths.as_slice(), &options, diagnostics::default_sink())?;
            while let Some(event) = handle.recv().await {
                match event {
                    WatchEvent::Changed(change) => println!("{} has been changed", change.path.display()),
                    WatchEvent::Error { root, message } => {
                        eprintln!("{}: {message}", root.display());
                    }
                }
            }
        }
        Commands::Mtime { path } => println!("{}", ops::last_modified_time(path).await?),
        Commands::Stat { path } => {
            let kind = if ops::is_directory(path).await {
                "directory"
            } else if ops::is_file(path).await {
                "file"
            } else {
                "missing"
            };
            println!("{kind}");
        }
        Commands::Mkdir { path } => {
            ops::create_directory(path).await?;
            if !quiet {
                println!("Created {}", path.display());
            }
        }
        Commands::Copy { src, dest } => {
            let bytes = if ops::is_directory(src).await {
                ops::copy_directory(src, dest).await?
            } else {
                ops::copy_file(src, dest).await?
            };
            if !quiet {
                println!("Copied {} -> {} ({bytes} bytes)", src.display(), dest.display());
            }
        }
        Commands::Rm { path } => {
            ops::remove_path(path).await?;
            if !quiet {
                println!("Removed {}", path.display());
            }
        }
        Commands::Cat { path } => print!("{}", ops::read_text_file(path).await?),
        Commands::Write { path, text } => ops::write_text_file(path, text).await?,
    }

    Ok(())
}
