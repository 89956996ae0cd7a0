//! collect
//!
//! Metadata aggregation from external collaborators.
//!
//! # Modules
//!
//! - [`command`] - Shell command seam ([`CommandRunner`])
//! - [`vars`] - Build variable seam ([`VariableSource`]) and `bitbake -e` parsing
//! - [`layers`] - Revision info for each `BBLAYERS` entry
//! - [`aggregate`] - The [`Collector`] that assembles the document
//!
//! # Failure Model
//!
//! Expected absences (no OS-release file, a layer outside git, a detached
//! HEAD) are represented in the document and never surface as errors.
//! Everything else aborts collection: there is no partial document.

pub mod aggregate;
pub mod command;
pub mod layers;
pub mod vars;

pub use aggregate::{Collector, HOST_DISTRO_KEYS, METADATA_CONFIG_VARS};
pub use command::{CommandError, CommandRunner, ShellRunner};
pub use layers::get_layers;
pub use vars::{parse_env_dump, BitbakeEnv, BuildVars, EnvDumpFile, VarError, VariableSource};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::keyvalue::KeyValueError;
use crate::git::GitError;

/// Errors that abort metadata collection.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to query host name: {0}")]
    Hostname(#[source] CommandError),

    #[error(transparent)]
    Variables(#[from] VarError),

    #[error("failed to read OS release info: {0}")]
    OsRelease(#[from] KeyValueError),

    #[error("failed to inspect revision of '{path}': {source}")]
    Revision { path: PathBuf, source: GitError },

    #[error("{0} is not supported")]
    Unsupported(&'static str),
}
