//! cli
//!
//! Command-line interface layer for testmeta.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and set up logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that wire the [`crate::collect`] collaborators together.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::ui::logging;
use crate::ui::output::Verbosity;

/// Execution context shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory relative paths are resolved against.
    pub cwd: PathBuf,
    /// Loaded configuration.
    pub config: Config,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

impl Context {
    /// Resolve a path given on the command line or in the config.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_in(&self.cwd, path)
    }
}

fn resolve_in(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    logging::init(verbosity);

    let cwd = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let config_path = cli.config.as_deref().map(|path| resolve_in(&cwd, path));
    let config = Config::load(config_path.as_deref()).context("Failed to load config")?;
    if let Some(path) = config.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let ctx = Context {
        cwd,
        config,
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}
