//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Use this config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// testmeta - Collect build host metadata for test-result analytics
#[derive(Parser, Debug)]
#[command(name = "testmeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if testmeta was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Where collection inputs come from. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read build variables from a saved `bitbake -e` dump instead of
    /// running bitbake
    #[arg(long, value_name = "FILE")]
    pub env_dump: Option<PathBuf>,

    /// OS-release file describing the host
    #[arg(long, value_name = "FILE")]
    pub os_release: Option<PathBuf>,

    /// Directory whose revision is recorded as bitbake's
    #[arg(long, value_name = "DIR")]
    pub bitbake_dir: Option<PathBuf>,

    /// Build directory to run `bitbake -e` in
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect metadata and write it as an XML file
    #[command(
        name = "write",
        long_about = "Collect host, distro, layer, and build configuration metadata \
            and write it as a pretty-printed XML document.\n\n\
            An existing file at PATH is overwritten.",
        after_help = "\
EXAMPLES:
    # From inside an initialized build directory
    testmeta write tmp/log/metadata.xml

    # From a saved environment dump
    bitbake -e > env.txt
    testmeta write metadata.xml --env-dump env.txt"
    )]
    Write {
        /// Output file
        path: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Collect metadata and print it
    Show {
        /// Print JSON instead of XML
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the key/value pairs of an OS-release file
    #[command(name = "os-release")]
    OsRelease {
        /// File to read (defaults to the configured OS-release file)
        path: Option<PathBuf>,
    },

    /// Print the git revision info of a path
    #[command(name = "rev-info")]
    RevInfo {
        /// Path inside (or outside) a repository
        path: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
INSTALLATION:
    # Bash
    testmeta completion bash > ~/.local/share/bash-completion/completions/testmeta

    # Zsh
    testmeta completion zsh > ~/.zfunc/_testmeta

    # Fish
    testmeta completion fish > ~/.config/fish/completions/testmeta.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
        }
    }
}
