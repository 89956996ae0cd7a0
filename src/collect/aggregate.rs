//! collect::aggregate
//!
//! Assembles the metadata document.
//!
//! # Document Shape
//!
//! Top-level fields, in this order:
//!
//! | field         | content                                              |
//! |---------------|------------------------------------------------------|
//! | `hostname`    | output of the host name command                      |
//! | `distro`      | `id`, `version_id`, `pretty_name` of the built distro |
//! | `host_distro` | same keys from the host OS-release file, if present  |
//! | `layers`      | layer name to revision info                          |
//! | `bitbake`     | revision info of the build tool's own source         |
//! | `config`      | allowlisted build variables, sorted by name          |

use std::path::{Path, PathBuf};

use crate::core::keyvalue::read_key_value_file;
use crate::core::types::MetaMap;
use crate::git::RevisionInfo;

use super::command::CommandRunner;
use super::layers::get_layers;
use super::vars::{BuildVars, VariableSource};
use super::CollectError;

/// Build variables copied verbatim into the `config` field.
pub const METADATA_CONFIG_VARS: [&str; 3] = ["MACHINE", "BB_NUMBER_THREADS", "PARALLEL_MAKE"];

/// OS-release keys copied into `host_distro`.
pub const HOST_DISTRO_KEYS: [&str; 3] = ["id", "version_id", "pretty_name"];

const DISTRO: &str = "DISTRO";
const DISTRO_VERSION: &str = "DISTRO_VERSION";
const BBLAYERS: &str = "BBLAYERS";

/// Collects metadata from the host, the build configuration, and the
/// source layers.
///
/// # Example
///
/// ```ignore
/// use testmeta::collect::{BitbakeEnv, Collector, ShellRunner};
///
/// let runner = ShellRunner;
/// let vars = BitbakeEnv::new(&runner).in_dir("/srv/poky/build");
/// let metadata = Collector::new(&runner, &vars).metadata_from_bb()?;
/// ```
pub struct Collector<'a> {
    runner: &'a dyn CommandRunner,
    vars: &'a dyn VariableSource,
    os_release: PathBuf,
    hostname_command: String,
    bitbake_dir: Option<PathBuf>,
}

impl<'a> Collector<'a> {
    /// Create a collector with default locations.
    pub fn new(runner: &'a dyn CommandRunner, vars: &'a dyn VariableSource) -> Self {
        Self {
            runner,
            vars,
            os_release: PathBuf::from(crate::core::config::DEFAULT_OS_RELEASE),
            hostname_command: crate::core::config::DEFAULT_HOSTNAME_COMMAND.to_string(),
            bitbake_dir: None,
        }
    }

    /// Read host distro info from this file instead of `/etc/os-release`.
    pub fn with_os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    /// Query the host name with this command.
    pub fn with_hostname_command(mut self, command: impl Into<String>) -> Self {
        self.hostname_command = command.into();
        self
    }

    /// Record the revision of this directory as the build tool's source
    /// instead of locating `bitbake` on `PATH`.
    pub fn with_bitbake_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bitbake_dir = Some(dir.into());
        self
    }

    /// Collect the full metadata document.
    ///
    /// # Errors
    ///
    /// - [`CollectError::Hostname`] if the host name command fails
    /// - [`CollectError::Variables`] if the variable query fails or omits a
    ///   required variable
    /// - [`CollectError::OsRelease`] if the OS-release file is unreadable or
    ///   malformed (a missing file is fine)
    /// - [`CollectError::Revision`] on unexpected repository errors
    pub fn metadata_from_bb(&self) -> Result<MetaMap, CollectError> {
        let mut info = MetaMap::new();

        let hostname = self
            .runner
            .run(&self.hostname_command, None)
            .map_err(CollectError::Hostname)?;
        info.insert("hostname", hostname);

        let mut names = vec![DISTRO, DISTRO_VERSION, BBLAYERS];
        names.extend(METADATA_CONFIG_VARS);
        let data = self.vars.query(&names)?;

        info.insert("distro", distro_info(&data)?);

        if let Some(host_distro) = self.host_distro()? {
            info.insert("host_distro", host_distro);
        }

        info.insert("layers", get_layers(data.require(BBLAYERS)?)?);
        info.insert("bitbake", self.bitbake_info()?);
        info.insert("config", config_info(&data)?);

        Ok(info)
    }

    /// Collect metadata from an in-process build data store.
    ///
    /// Not supported yet: always returns [`CollectError::Unsupported`].
    pub fn metadata_from_data_store(&self, _store: &BuildVars) -> Result<MetaMap, CollectError> {
        Err(CollectError::Unsupported("collecting metadata from a data store"))
    }

    fn host_distro(&self) -> Result<Option<MetaMap>, CollectError> {
        let Some(os_release) = read_key_value_file(&self.os_release)? else {
            tracing::debug!(path = %self.os_release.display(), "no OS release file");
            return Ok(None);
        };
        if os_release.is_empty() {
            return Ok(None);
        }

        let host_distro = HOST_DISTRO_KEYS
            .iter()
            .filter_map(|key| os_release.get_str(key).map(|value| (*key, value)))
            .collect();
        Ok(Some(host_distro))
    }

    fn bitbake_info(&self) -> Result<MetaMap, CollectError> {
        let dir = match &self.bitbake_dir {
            Some(dir) => dir.clone(),
            None => match locate_bitbake_lib() {
                Some(dir) => dir,
                None => {
                    tracing::warn!("bitbake not found on PATH, its revision is not recorded");
                    return Ok(MetaMap::new());
                }
            },
        };

        let info = RevisionInfo::inspect(&dir).map_err(|e| CollectError::Revision {
            path: dir.clone(),
            source: e,
        })?;
        Ok(info.to_map())
    }
}

fn distro_info(data: &BuildVars) -> Result<MetaMap, CollectError> {
    let distro = data.require(DISTRO)?;
    let version = data.require(DISTRO_VERSION)?;

    let mut info = MetaMap::new();
    info.insert("id", distro);
    info.insert("version_id", version);
    info.insert("pretty_name", format!("{} {}", distro, version));
    Ok(info)
}

fn config_info(data: &BuildVars) -> Result<MetaMap, CollectError> {
    let mut vars = METADATA_CONFIG_VARS;
    vars.sort_unstable();

    let mut config = MetaMap::new();
    for var in vars {
        config.insert(var, data.require(var)?);
    }
    Ok(config)
}

/// Find the `bb` library directory of the `bitbake` on `PATH`.
///
/// `bitbake` lives in `<prefix>/bin`, its python package in `<prefix>/lib/bb`.
fn locate_bitbake_lib() -> Option<PathBuf> {
    let exe = which::which("bitbake").ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .and_then(Path::parent)
        .map(|prefix| prefix.join("lib").join("bb"))
}
