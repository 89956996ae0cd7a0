//! core::keyvalue
//!
//! `KEY=VALUE` file parsing, as used by `/etc/os-release`.
//!
//! # Format
//!
//! One assignment per line. The key is everything before the first `=`,
//! trimmed and lowercased. The value is everything after it, trimmed, with
//! one leading and one trailing double quote removed.
//!
//! Blank lines and `#` comment lines are skipped. Any other line without an
//! `=` is a parse error.
//!
//! # Example
//!
//! ```
//! use testmeta::core::keyvalue::parse_key_values;
//!
//! let data = parse_key_values("ID=poky\nPRETTY_NAME=\"Poky 5.0\"\n").unwrap();
//! assert_eq!(data.get_str("id"), Some("poky"));
//! assert_eq!(data.get_str("pretty_name"), Some("Poky 5.0"));
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::MetaMap;

/// Errors from key-value file parsing.
///
/// Blank lines and `#` comments are not errors: os-release(5) allows both,
/// so they are skipped rather than rejected as lines without `=`.
#[derive(Debug, Error)]
pub enum KeyValueError {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("line {line}: expected KEY=VALUE, found '{content}'")]
    MissingSeparator { line: usize, content: String },
}

/// Parse a key-value file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// - [`KeyValueError::Read`] if the file exists but cannot be read
/// - [`KeyValueError::MissingSeparator`] for a line without `=`
pub fn read_key_value_file(path: &Path) -> Result<Option<MetaMap>, KeyValueError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(KeyValueError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    parse_key_values(&contents).map(Some)
}

/// Parse key-value text into an ordered mapping.
///
/// A key that appears twice keeps its first position and its last value.
pub fn parse_key_values(contents: &str) -> Result<MetaMap, KeyValueError> {
    let mut data = MetaMap::new();

    for (idx, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| KeyValueError::MissingSeparator {
                line: idx + 1,
                content: line.to_string(),
            })?;

        data.insert(key.trim().to_lowercase(), unquote(value.trim()));
    }

    Ok(data)
}

/// Strip one leading and one trailing double quote.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims_keys() {
        let data = parse_key_values("  VERSION_ID =5.0\n").unwrap();
        assert_eq!(data.get_str("version_id"), Some("5.0"));
    }

    #[test]
    fn strips_one_layer_of_quotes() {
        let data = parse_key_values("NAME=\"\"Poky\"\"\n").unwrap();
        assert_eq!(data.get_str("name"), Some("\"Poky\""));
    }

    #[test]
    fn unbalanced_quote_is_stripped() {
        let data = parse_key_values("NAME=\"Poky\n").unwrap();
        assert_eq!(data.get_str("name"), Some("Poky"));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let data = parse_key_values("HOME_URL=\"https://x.org/?a=b\"\n").unwrap();
        assert_eq!(data.get_str("home_url"), Some("https://x.org/?a=b"));
    }

    #[test]
    fn keeps_file_order() {
        let data = parse_key_values("NAME=a\nID=b\nVERSION=c\n").unwrap();
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["name", "id", "version"]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let data = parse_key_values("# generated\n\nID=poky\n   \n").unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn missing_separator_is_an_error() {
        let err = parse_key_values("ID=poky\ngarbage\n").unwrap_err();
        match err {
            KeyValueError::MissingSeparator { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "garbage");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = read_key_value_file(&dir.path().join("os-release")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("os-release");
        std::fs::write(&path, "ID=debian\nVERSION_ID=\"12\"\n").unwrap();

        let data = read_key_value_file(&path).unwrap().unwrap();
        assert_eq!(data.get_str("id"), Some("debian"));
        assert_eq!(data.get_str("version_id"), Some("12"));
    }
}
