//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;
use uigen_core::cli::ExitCode;

/// Writes the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::CommandFactory;
/// use clap_complete::Shell;
/// use uigen_cli::cli::Cli;
/// use uigen_cli::commands::completions;
///
/// completions::generate_completions(Shell::Bash, &mut Cli::command());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    info!("Generating {} completions", shell);
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Runs the completions command.
///
/// # Errors
///
/// Never fails; returns `Result` like every other command.
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    #[test]
    fn test_generate_completions_for_cli() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            generate_completions(shell, &mut Cli::command());
        }
    }

    #[tokio::test]
    async fn test_run() {
        let result = run(Shell::Bash, &mut Cli::command()).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }
}
