//! UIGen CLI.
//!
//! Works on project files outside an agent host: seed a project from a
//! starter, replay tool calls against it, inspect it, render its preview,
//! and export it to disk.
//!
//! # Examples
//!
//! ```bash
//! # Seed a project and render it
//! uigen init project.json --starter card
//! uigen preview project.json --dark
//!
//! # Replay a recorded agent session
//! uigen apply project.json --calls session.jsonl
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uigen_cli::cli::{Cli, Commands};
use uigen_cli::commands;
use uigen_core::cli::{ExitCode, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = match cli.format.parse::<OutputFormat>() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(ExitCode::INVALID_INPUT.as_i32());
        }
    };

    let exit_code = execute_command(cli, output_format).await?;

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr.
///
/// Quiet by default so reports on stdout stay readable; `--verbose` turns
/// on debug output and `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a parsed command line to its handler.
async fn execute_command(cli: Cli, output_format: OutputFormat) -> Result<ExitCode> {
    match cli.command {
        Commands::Init {
            project,
            starter,
            force,
        } => commands::init::run(project, starter, force, output_format).await,
        Commands::Apply { project, calls } => {
            commands::apply::run(project, calls, output_format).await
        }
        Commands::View {
            project,
            path,
            start,
            end,
        } => commands::view::run(project, path, start, end, output_format).await,
        Commands::Preview {
            project,
            output,
            dark,
        } => commands::preview::run(project, output, dark, cli.config, output_format).await,
        Commands::Export {
            project,
            dir,
            no_overwrite,
        } => commands::export::run(project, dir, no_overwrite, output_format).await,
        Commands::Schema => commands::schema::run(output_format).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
