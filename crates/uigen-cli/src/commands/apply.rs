//! Apply command implementation.
//!
//! Replays agent tool calls against a project file. Calls run in order;
//! a failing call is reported and the rest still run, as they would in an
//! agent loop.

use super::common::{load_project, save_project};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_files::VirtualFileSystem;
use uigen_tools::{ToolCall, ToolError};

/// Outcome of one call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CallReport {
    /// Tool the call was routed to
    pub tool: String,
    /// What the tool answered
    pub output: String,
    /// Whether the call failed
    pub error: bool,
}

/// Outcome of a batch of calls.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ApplyReport {
    /// Calls that succeeded
    pub applied: usize,
    /// Calls that failed
    pub failed: usize,
    /// Per-call results, in order
    pub calls: Vec<CallReport>,
}

impl ApplyReport {
    /// Returns `true` if any call failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Parses a batch of calls.
///
/// Accepts a JSON array of `{"name", "arguments"}` objects, or one such
/// object per line. Blank lines are skipped.
///
/// # Errors
///
/// Returns the first call that cannot be decoded.
///
/// # Examples
///
/// ```
/// use uigen_cli::commands::apply::parse_calls;
///
/// let calls = parse_calls(
///     r#"{"name": "str_replace_editor", "arguments": {"command": "create", "path": "/App.jsx"}}
/// {"name": "file_manager", "arguments": {"command": "delete", "path": "/old.jsx"}}"#,
/// )?;
/// assert_eq!(calls.len(), 2);
/// assert_eq!(calls[1].tool(), "file_manager");
/// # Ok::<(), uigen_tools::ToolError>(())
/// ```
pub fn parse_calls(input: &str) -> Result<Vec<ToolCall>, ToolError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        let batch: Vec<Envelope> =
            serde_json::from_str(trimmed).map_err(|source| ToolError::InvalidArguments {
                tool: "",
                source,
            })?;
        return batch
            .into_iter()
            .map(|call| ToolCall::from_parts(&call.name, call.arguments))
            .collect();
    }

    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ToolCall::from_json)
        .collect()
}

#[derive(Deserialize)]
struct Envelope {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Runs `calls` against `vfs`.
#[must_use]
pub fn apply_calls(vfs: &mut VirtualFileSystem, calls: &[ToolCall]) -> ApplyReport {
    let mut report = ApplyReport {
        applied: 0,
        failed: 0,
        calls: Vec::with_capacity(calls.len()),
    };

    for call in calls {
        let output = call.execute(vfs);
        let error = output.is_error();
        if error {
            warn!(tool = call.tool(), %output, "tool call failed");
            report.failed += 1;
        } else {
            report.applied += 1;
        }
        report.calls.push(CallReport {
            tool: call.tool().to_string(),
            output: output.to_string(),
            error,
        });
    }
    report
}

/// Loads `project`, applies `calls`, and saves it if anything changed.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded or saved.
pub async fn apply_to_project(project: &Path, calls: &[ToolCall]) -> Result<ApplyReport> {
    let mut vfs = load_project(project).await?;
    let before = vfs.refresh_count();
    let report = apply_calls(&mut vfs, calls);

    if vfs.refresh_count() != before {
        save_project(project, &vfs).await?;
    }
    info!(
        applied = report.applied,
        failed = report.failed,
        "applied tool calls"
    );
    Ok(report)
}

/// Runs the apply command.
///
/// Exits with `TOOL_FAILED` when any call failed.
///
/// # Errors
///
/// Returns an error if the calls cannot be read or decoded, or the project
/// cannot be loaded or saved.
pub async fn run(
    project: PathBuf,
    calls: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let input = match &calls {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read calls from {}", path.display()))?,
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("failed to read calls from stdin")?;
            input
        }
    };

    let calls = parse_calls(&input).context("invalid tool call")?;
    let report = apply_to_project(&project, &calls).await?;

    let formatted = format_output(&report, output_format).context("failed to format report")?;
    println!("{formatted}");

    Ok(ExitCode::on_failure(
        report.has_failures(),
        ExitCode::TOOL_FAILED,
    ))
}
