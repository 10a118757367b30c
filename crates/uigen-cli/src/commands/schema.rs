//! Schema command implementation.
//!
//! Prints the name, description and argument schema of both editing tools,
//! as an agent host would register them.

use crate::formatters::format_output;
use anyhow::{Context, Result};
use uigen_core::cli::{ExitCode, OutputFormat};

/// Runs the schema command.
///
/// # Errors
///
/// Returns an error if the definitions cannot be formatted.
pub async fn run(output_format: OutputFormat) -> Result<ExitCode> {
    let definitions = uigen_tools::definitions();
    let formatted =
        format_output(&definitions, output_format).context("failed to format tool schemas")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
