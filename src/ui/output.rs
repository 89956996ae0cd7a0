//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout and respect the quiet flag. Diagnostics are not
//! printed here; they go through `tracing` to stderr.

use std::fmt::Display;

use crate::core::types::{MetaMap, MetaValue};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default `tracing` filter directive for this verbosity.
    pub fn log_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Debug => "debug",
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Format a mapping as indented `key: value` lines.
///
/// Nested mappings are listed under their key, indented two spaces per
/// level. Empty mappings show as `key: (none)`.
pub fn format_map(map: &MetaMap) -> String {
    let mut lines = Vec::new();
    push_map_lines(map, 0, &mut lines);
    lines.join("\n")
}

fn push_map_lines(map: &MetaMap, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (key, value) in map {
        match value {
            MetaValue::Scalar(text) => lines.push(format!("{}{}: {}", indent, key, text)),
            MetaValue::Map(inner) if inner.is_empty() => {
                lines.push(format!("{}{}: (none)", indent, key))
            }
            MetaValue::Map(inner) => {
                lines.push(format!("{}{}:", indent, key));
                push_map_lines(inner, depth + 1, lines);
            }
        }
    }
}
