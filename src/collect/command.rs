//! collect::command
//!
//! Shell command execution seam.
//!
//! The aggregator only needs the standard output of a command. Tests swap
//! in canned runners through the [`CommandRunner`] trait.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Errors from running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("'{command}' produced non-UTF-8 output")]
    InvalidOutput { command: String },
}

/// Runs a shell command and returns its standard output.
pub trait CommandRunner {
    /// Run `command`, optionally inside `cwd`.
    ///
    /// Trailing whitespace is stripped from the returned output.
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<String, CommandError>;
}

/// Runs commands through `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: Option<&Path>) -> Result<String, CommandError> {
        tracing::debug!(command, "running command");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| CommandError::Spawn {
            command: command.to_string(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| CommandError::InvalidOutput {
            command: command.to_string(),
        })?;

        Ok(stdout.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_without_trailing_newline() {
        let out = ShellRunner.run("echo builder-01", None).unwrap();
        assert_eq!(out, "builder-01");
    }

    #[test]
    fn runs_in_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let out = ShellRunner.run("ls", Some(dir.path())).unwrap();
        assert_eq!(out, "marker");
    }

    #[test]
    fn non_zero_exit_is_error() {
        let err = ShellRunner.run("echo oops >&2; exit 3", None).unwrap_err();
        match err {
            CommandError::Failed { stderr, .. } => assert_eq!(stderr, "oops"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
