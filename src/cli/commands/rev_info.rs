//! rev-info command - Print the git revision info of a path

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::git::RevisionInfo;
use crate::ui::output;

/// Print commit, commit count, and branch for `path`.
pub fn rev_info(ctx: &Context, path: &Path) -> Result<()> {
    let path = ctx.resolve(path);
    let info = RevisionInfo::inspect(&path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;

    if info.is_tracked() {
        output::print(output::format_map(&info.to_map()), ctx.verbosity);
    } else {
        output::print(
            format!("{} is not under version control", path.display()),
            ctx.verbosity,
        );
    }
    Ok(())
}
