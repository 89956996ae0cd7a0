//! show command - Collect metadata and print it

use anyhow::{Context as _, Result};

use super::collect_metadata;
use crate::cli::args::SourceArgs;
use crate::cli::Context;
use crate::xml::{to_node, to_pretty_xml, METADATA_ROOT};

/// Print the collected metadata as XML, or as JSON with `json`.
///
/// The document is the command's result, so it is printed even in quiet
/// mode.
pub fn show(ctx: &Context, json: bool, source: &SourceArgs) -> Result<()> {
    let metadata = collect_metadata(ctx, source)?;

    let rendered = if json {
        serde_json::to_string_pretty(&metadata).context("Failed to encode metadata as JSON")?
    } else {
        to_pretty_xml(&to_node(METADATA_ROOT, &metadata)).context("Failed to encode metadata as XML")?
    };

    println!("{}", rendered.trim_end());
    Ok(())
}
