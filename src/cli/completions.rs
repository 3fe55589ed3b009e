//! Completions command for generating shell completions.

use crate::cli::Cli;
use anyhow::{bail, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

/// Generate command-line completions into `out`.
pub fn generate_to(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

/// Generate command-line completions on stdout.
///
/// Without an explicit shell, the one from `$SHELL` is used.
pub fn generate(shell: Option<Shell>) -> Result<()> {
    let Some(shell) = shell.or_else(Shell::from_env) else {
        bail!("Could not automatically detect shell");
    };
    generate_to(shell, &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_commands() {
        let mut out = Vec::new();
        generate_to(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("genframe"));
        assert!(script.contains("generate"));
        assert!(script.contains("status"));
    }
}
