//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Example
//!
//! ```toml
//! os_release = "/etc/os-release"
//! bitbake_dir = "/srv/poky/bitbake/lib/bb"
//! build_dir = "/srv/poky/build"
//! hostname_command = "hostname -f"
//! ```
//!
//! Every field is optional; accessors on [`super::Config`] supply defaults.

use std::path::PathBuf;

use serde::Deserialize;

use super::ConfigError;

/// Contents of a `testmeta` configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// OS-release file describing the host
    pub os_release: Option<PathBuf>,

    /// Source directory of the build tool whose revision is recorded
    pub bitbake_dir: Option<PathBuf>,

    /// Working directory for `bitbake -e`
    pub build_dir: Option<PathBuf>,

    /// Shell command whose output is the host name
    pub hostname_command: Option<String>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cmd) = &self.hostname_command {
            if cmd.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "hostname_command cannot be empty".to_string(),
                ));
            }
        }

        for (field, path) in [
            ("os_release", &self.os_release),
            ("bitbake_dir", &self.bitbake_dir),
            ("build_dir", &self.build_dir),
        ] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} cannot be an empty path",
                    field
                )));
            }
        }

        Ok(())
    }
}
