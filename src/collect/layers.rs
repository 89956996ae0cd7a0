//! collect::layers
//!
//! Revision info for every layer listed in `BBLAYERS`.

use std::path::Path;

use crate::core::types::MetaMap;
use crate::git::RevisionInfo;

use super::CollectError;

/// Map each whitespace-separated layer path to its revision info, keyed by
/// the final path component.
///
/// Output order follows input order. Two layers sharing a basename collapse
/// into one entry: the first one's position, the last one's revision info.
pub fn get_layers(layers: &str) -> Result<MetaMap, CollectError> {
    let mut layer_map = MetaMap::new();

    for layer in layers.split_whitespace() {
        let path = Path::new(layer);
        let name = layer_name(path);

        let info = RevisionInfo::inspect(path).map_err(|e| CollectError::Revision {
            path: path.to_path_buf(),
            source: e,
        })?;

        if layer_map.insert(name, info.to_map()).is_some() {
            tracing::warn!(layer, "duplicate layer name, keeping the later entry");
        }
    }

    Ok(layer_map)
}

/// The basename of a layer path, tolerating trailing separators.
fn layer_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
