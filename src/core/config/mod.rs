//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (applied by the caller through the public fields)
//!
//! # Config Locations
//!
//! Searched in order, first hit wins:
//! 1. An explicit path (`--config`)
//! 2. `$TESTMETA_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/testmeta/config.toml`
//! 4. `~/.testmeta/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use testmeta::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("OS release: {}", config.os_release().display());
//! println!("Hostname via: {}", config.hostname_command());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default OS-release location.
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// Default command used to query the host name.
pub const DEFAULT_HOSTNAME_COMMAND: &str = "hostname";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file (or defaults)
    pub file: FileConfig,
    /// Path the file was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// an explicitly requested file is missing. Missing files at default
    /// locations are not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from(path);
        }

        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    fn find_config_file() -> Option<PathBuf> {
        // 1. Check $TESTMETA_CONFIG
        if let Ok(path) = std::env::var("TESTMETA_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/testmeta/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("testmeta/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.testmeta/config.toml
        dirs::home_dir()
            .map(|home| home.join(".testmeta/config.toml"))
            .filter(|path| path.exists())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the OS-release file path.
    ///
    /// Defaults to `/etc/os-release`.
    pub fn os_release(&self) -> PathBuf {
        self.file
            .os_release
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OS_RELEASE))
    }

    /// Get the configured build tool source directory, if any.
    pub fn bitbake_dir(&self) -> Option<&Path> {
        self.file.bitbake_dir.as_deref()
    }

    /// Get the configured build directory, if any.
    pub fn build_dir(&self) -> Option<&Path> {
        self.file.build_dir.as_deref()
    }

    /// Get the host name command.
    ///
    /// Defaults to `hostname`.
    pub fn hostname_command(&self) -> &str {
        self.file
            .hostname_command
            .as_deref()
            .unwrap_or(DEFAULT_HOSTNAME_COMMAND)
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
