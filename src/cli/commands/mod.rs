//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler resolves its inputs against the [`Context`], calls into the
//! library, and formats the result.

mod completion;
mod os_release;
mod rev_info;
mod show;
mod write;

pub use completion::completion;
pub use os_release::os_release;
pub use rev_info::rev_info;
pub use show::show;
pub use write::write;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, SourceArgs};
use crate::cli::Context;
use crate::collect::{BitbakeEnv, Collector, EnvDumpFile, ShellRunner, VariableSource};
use crate::core::types::MetaMap;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Write { path, source } => write::write(ctx, &path, &source),
        Command::Show { json, source } => show::show(ctx, json, &source),
        Command::OsRelease { path } => os_release::os_release(ctx, path.as_deref()),
        Command::RevInfo { path } => rev_info::rev_info(ctx, &path),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Collect the metadata document using the configured collaborators.
///
/// Flags in `source` take precedence over the config file.
pub(crate) fn collect_metadata(ctx: &Context, source: &SourceArgs) -> Result<MetaMap> {
    let config = &ctx.config;
    let runner = ShellRunner;

    let build_dir = source
        .build_dir
        .as_deref()
        .or(config.build_dir())
        .map(|p| ctx.resolve(p))
        .unwrap_or_else(|| ctx.cwd.clone());

    let vars: Box<dyn VariableSource + '_> = match &source.env_dump {
        Some(dump) => Box::new(EnvDumpFile::new(ctx.resolve(dump))),
        None => Box::new(BitbakeEnv::new(&runner).in_dir(build_dir)),
    };

    let os_release = source
        .os_release
        .as_deref()
        .map(|p| ctx.resolve(p))
        .unwrap_or_else(|| ctx.resolve(&config.os_release()));

    let mut collector = Collector::new(&runner, vars.as_ref())
        .with_os_release(os_release)
        .with_hostname_command(config.hostname_command());

    if let Some(dir) = source.bitbake_dir.as_deref().or(config.bitbake_dir()) {
        collector = collector.with_bitbake_dir(ctx.resolve(dir));
    }

    collector
        .metadata_from_bb()
        .context("Failed to collect metadata")
}
