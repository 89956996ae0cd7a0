//! write command - Collect metadata and write it as an XML file

use std::path::Path;

use anyhow::{Context as _, Result};

use super::collect_metadata;
use crate::cli::args::SourceArgs;
use crate::cli::Context;
use crate::ui::output;
use crate::xml::write_metadata_file;

/// Collect metadata and write it to `path`.
pub fn write(ctx: &Context, path: &Path, source: &SourceArgs) -> Result<()> {
    let metadata = collect_metadata(ctx, source)?;

    let target = ctx.resolve(path);
    write_metadata_file(&target, &metadata)
        .with_context(|| format!("Failed to write metadata to {}", target.display()))?;

    output::success(format!("Wrote metadata to {}", target.display()), ctx.verbosity);
    Ok(())
}
