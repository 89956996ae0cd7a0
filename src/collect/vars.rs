//! collect::vars
//!
//! Build variable query seam.
//!
//! # Sources
//!
//! - [`BitbakeEnv`] runs `bitbake -e` and parses the environment dump
//! - [`EnvDumpFile`] parses a dump saved earlier with `bitbake -e > file`
//!
//! # Dump Format
//!
//! ```text
//! # $DISTRO [2 operations]
//! DISTRO="poky"
//! export PATH="/usr/bin:/bin"
//! BBLAYERS=" \
//!   /srv/poky/meta \
//!   /srv/poky/meta-poky \
//!   "
//! unset MAKEFLAGS
//! ```
//!
//! Embedded newlines are written as ` \` at the end of a line, and `"` and
//! `$` are escaped with a backslash. Backslashes are not escaped, so a line
//! ending in `"` always closes its value. Unexported variables appear as
//! `unset NAME` after a history comment holding their value. Other comment
//! lines and functions are ignored.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use super::command::{CommandError, CommandRunner};

/// Errors from querying build variables.
#[derive(Debug, Error)]
pub enum VarError {
    #[error("failed to query build environment: {0}")]
    Command(#[from] CommandError),

    #[error("failed to read environment dump '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("required build variable {0} is not set")]
    Missing(String),
}

/// Values returned by a variable query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildVars {
    values: HashMap<String, String>,
}

impl BuildVars {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a value, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a value that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::Missing`] if the variable was not returned.
    pub fn require(&self, name: &str) -> Result<&str, VarError> {
        self.get(name)
            .ok_or_else(|| VarError::Missing(name.to_string()))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were returned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = BuildVars::new();
        for (k, v) in iter {
            vars.set(k, v);
        }
        vars
    }
}

/// Produces values for named build variables.
pub trait VariableSource {
    /// Query the given variable names.
    ///
    /// Names the source does not know are simply absent from the result;
    /// callers decide which ones are required.
    fn query(&self, names: &[&str]) -> Result<BuildVars, VarError>;
}

impl VariableSource for BuildVars {
    fn query(&self, names: &[&str]) -> Result<BuildVars, VarError> {
        Ok(names
            .iter()
            .filter_map(|name| self.get(name).map(|v| (*name, v)))
            .collect())
    }
}

/// Queries variables by running `bitbake -e`.
pub struct BitbakeEnv<'a> {
    runner: &'a dyn CommandRunner,
    build_dir: Option<PathBuf>,
}

impl<'a> BitbakeEnv<'a> {
    /// Create a source that runs `bitbake -e` through `runner`.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            runner,
            build_dir: None,
        }
    }

    /// Run `bitbake -e` inside this build directory.
    pub fn in_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = Some(build_dir.into());
        self
    }
}

impl VariableSource for BitbakeEnv<'_> {
    fn query(&self, names: &[&str]) -> Result<BuildVars, VarError> {
        let dump = self.runner.run("bitbake -e", self.build_dir.as_deref())?;
        Ok(parse_env_dump(&dump, names))
    }
}

/// Reads variables from a saved `bitbake -e` dump.
#[derive(Debug, Clone)]
pub struct EnvDumpFile {
    path: PathBuf,
}

impl EnvDumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VariableSource for EnvDumpFile {
    fn query(&self, names: &[&str]) -> Result<BuildVars, VarError> {
        let dump = std::fs::read_to_string(&self.path).map_err(|e| VarError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(parse_env_dump(&dump, names))
    }
}

/// Extract the requested variables from a `bitbake -e` dump.
///
/// A later assignment overrides an earlier one. `unset NAME` marks an
/// unexported variable: its value is taken from the `#   "value"` history
/// line just above it, and without one the variable is removed.
pub fn parse_env_dump(dump: &str, names: &[&str]) -> BuildVars {
    let mut vars = BuildVars::new();
    let mut lines = dump.lines();
    let mut previous: Option<&str> = None;

    while let Some(line) = lines.next() {
        let last = previous.replace(line);

        if let Some(name) = line.strip_prefix("unset ") {
            let name = name.trim();
            if names.contains(&name) {
                match last.and_then(history_value) {
                    Some(value) => vars.set(name, value),
                    None => {
                        vars.values.remove(name);
                    }
                }
            }
            continue;
        }

        let Some((name, rest)) = split_assignment(line) else {
            continue;
        };
        if !names.contains(&name) {
            continue;
        }

        let mut raw = rest;
        let mut value = String::new();
        loop {
            if let Some(text) = raw.strip_suffix('"') {
                value.push_str(text);
                break;
            }
            // Embedded newlines are written as ` \` at the end of the line.
            let Some(text) = raw.strip_suffix(" \\") else {
                value.push_str(raw);
                break;
            };
            value.push_str(text);
            let Some(next) = lines.next() else { break };
            value.push('\n');
            raw = next;
            previous = Some(next);
        }

        vars.set(name, unescape(&value));
    }

    vars
}

/// Split `[export ]NAME="...` into the name and the text after the opening
/// quote.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (name, rest) = line.split_once("=\"")?;
    let valid = !name.is_empty() && !name.contains(char::is_whitespace);
    valid.then_some((name, rest))
}

/// Value recorded in a `#   "value"` history comment.
fn history_value(line: &str) -> Option<&str> {
    let quoted = line.strip_prefix("#   \"")?;
    quoted.split('"').next()
}

/// Undo the `\$` and `\"` escapes of the dump. Backslashes themselves are
/// never escaped.
fn unescape(value: &str) -> String {
    value.replace("\\$", "$").replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    const DUMP: &str = r#"# $DISTRO [2 operations]
#   set /srv/poky/meta-poky/conf/distro/poky.conf:20
#     "poky"
DISTRO="poky"
DISTRO_VERSION="5.0.1"
export PATH="/usr/bin:/bin"
MACHINE="qemux86-64"
BBLAYERS=" \
  /srv/poky/meta \
  /srv/poky/meta-poky \
  "
PARALLEL_MAKE="-j 8"
BB_NUMBER_THREADS="8"
EXTRA="say \"hi\""
unset MAKEFLAGS
do_compile() {
    oe_runmake
}
"#;

    #[test]
    fn extracts_requested_variables_only() {
        let vars = parse_env_dump(DUMP, &["DISTRO", "MACHINE"]);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("DISTRO"), Some("poky"));
        assert_eq!(vars.get("MACHINE"), Some("qemux86-64"));
        assert!(vars.get("PATH").is_none());
    }

    #[test]
    fn handles_export_prefix() {
        let vars = parse_env_dump(DUMP, &["PATH"]);
        assert_eq!(vars.get("PATH"), Some("/usr/bin:/bin"));
    }

    #[test]
    fn joins_continued_values() {
        let vars = parse_env_dump(DUMP, &["BBLAYERS"]);
        let layers: Vec<_> = vars.get("BBLAYERS").unwrap().split_whitespace().collect();
        assert_eq!(layers, vec!["/srv/poky/meta", "/srv/poky/meta-poky"]);
    }

    #[test]
    fn unescapes_quotes() {
        let vars = parse_env_dump(DUMP, &["EXTRA"]);
        assert_eq!(vars.get("EXTRA"), Some("say \"hi\""));
    }

    #[test]
    fn trailing_backslash_value_does_not_swallow_next_line() {
        let dump = "DISTRO_VERSION=\"5.0\\\"\nMACHINE=\"qemux86\"\n";
        let vars = parse_env_dump(dump, &["DISTRO_VERSION", "MACHINE"]);
        assert_eq!(vars.get("DISTRO_VERSION"), Some("5.0\\"));
        assert_eq!(vars.get("MACHINE"), Some("qemux86"));
    }

    #[test]
    fn continued_lines_keep_newlines() {
        let dump = "EXTRA_OECONF=\"--a \\\n--b\"\nMACHINE=\"qemux86\"\n";
        let vars = parse_env_dump(dump, &["EXTRA_OECONF", "MACHINE"]);
        assert_eq!(vars.get("EXTRA_OECONF"), Some("--a\n--b"));
        assert_eq!(vars.get("MACHINE"), Some("qemux86"));
    }

    #[test]
    fn unescapes_dollar_signs() {
        let vars = parse_env_dump("PRICE=\"\\$HOME/x\"\n", &["PRICE"]);
        assert_eq!(vars.get("PRICE"), Some("$HOME/x"));
    }

    #[test]
    fn unset_takes_value_from_history_comment() {
        let dump = "# $MAKE [1 operations]\n#   set conf/local.conf:3\n#     \"make\"\n# pre-expansion value:\n#   \"make\"\nunset MAKE\n";
        let vars = parse_env_dump(dump, &["MAKE"]);
        assert_eq!(vars.get("MAKE"), Some("make"));
    }

    #[test]
    fn unset_removes_value() {
        let dump = "MAKEFLAGS=\"-j4\"\nunset MAKEFLAGS\n";
        let vars = parse_env_dump(dump, &["MAKEFLAGS"]);
        assert!(vars.get("MAKEFLAGS").is_none());
    }

    #[test]
    fn empty_value() {
        let vars = parse_env_dump("DISTRO_VERSION=\"\"\n", &["DISTRO_VERSION"]);
        assert_eq!(vars.get("DISTRO_VERSION"), Some(""));
    }

    #[test]
    fn require_reports_missing_name() {
        let vars = BuildVars::new();
        match vars.require("DISTRO") {
            Err(VarError::Missing(name)) => assert_eq!(name, "DISTRO"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    struct CannedRunner {
        output: String,
        seen: RefCell<Vec<(String, Option<PathBuf>)>>,
    }

    impl CommandRunner for CannedRunner {
        fn run(&self, command: &str, cwd: Option<&Path>) -> Result<String, CommandError> {
            self.seen
                .borrow_mut()
                .push((command.to_string(), cwd.map(Path::to_path_buf)));
            Ok(self.output.clone())
        }
    }

    #[test]
    fn bitbake_env_runs_in_build_dir() {
        let runner = CannedRunner {
            output: DUMP.to_string(),
            seen: RefCell::new(Vec::new()),
        };
        let source = BitbakeEnv::new(&runner).in_dir("/srv/poky/build");

        let vars = source.query(&["DISTRO_VERSION"]).unwrap();
        assert_eq!(vars.get("DISTRO_VERSION"), Some("5.0.1"));

        let seen = runner.seen.borrow();
        assert_eq!(seen[0].0, "bitbake -e");
        assert_eq!(seen[0].1.as_deref(), Some(Path::new("/srv/poky/build")));
    }

    #[test]
    fn env_dump_file_reads_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("env.txt");
        std::fs::write(&path, DUMP).unwrap();

        let vars = EnvDumpFile::new(&path).query(&["BB_NUMBER_THREADS"]).unwrap();
        assert_eq!(vars.get("BB_NUMBER_THREADS"), Some("8"));
    }

    #[test]
    fn env_dump_file_missing_is_read_error() {
        let result = EnvDumpFile::new("/nonexistent/env.txt").query(&["DISTRO"]);
        assert!(matches!(result, Err(VarError::Read { .. })));
    }
}
