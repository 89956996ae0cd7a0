//! os-release command - Print the key/value pairs of an OS-release file

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::keyvalue::read_key_value_file;
use crate::ui::output;

/// Print the parsed contents of `path`, or of the configured OS-release
/// file.
pub fn os_release(ctx: &Context, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => ctx.resolve(p),
        None => ctx.resolve(&ctx.config.os_release()),
    };

    let Some(data) = read_key_value_file(&path)
        .with_context(|| format!("Failed to parse {}", path.display()))?
    else {
        bail!("No OS release file at {}", path.display());
    };

    output::print(output::format_map(&data), ctx.verbosity);
    Ok(())
}
