//! completion command - Print a shell completion script for testmeta

use std::io::Write;

use anyhow::{Context as _, Result};
use clap::CommandFactory;

use crate::cli::args::{Cli, Shell};

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    render(shell, &mut stdout);
    stdout.flush().context("Failed to write completion script")
}

/// Render the completion script for `shell` into `out`.
fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        render(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_covers_subcommands() {
        let script = script(Shell::Bash);
        assert!(script.contains("testmeta"));
        assert!(script.contains("rev-info"));
        assert!(script.contains("--env-dump"));
    }

    #[test]
    fn fish_script_targets_binary() {
        assert!(script(Shell::Fish).contains("complete -c testmeta"));
    }
}
