//! View command implementation.
//!
//! Runs the text editor's `view` command against a project, so the output
//! is exactly what an agent would see.

use super::common::load_project;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_files::VirtualFileSystem;
use uigen_tools::{TextEditorParams, TextEditorTool};

/// Result of viewing a path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ViewReport {
    /// Path viewed
    pub path: String,
    /// Numbered lines or directory listing, or the tool's error
    pub output: String,
    /// Whether the view failed
    pub error: bool,
}

/// Views `path`, optionally limited to `start..=end` (1-based; `-1` is the
/// last line).
#[must_use]
pub fn view(
    vfs: &mut VirtualFileSystem,
    path: &str,
    start: Option<i64>,
    end: Option<i64>,
) -> ViewReport {
    let mut params = TextEditorParams::view(path);
    if let Some(start) = start {
        params = params.with_view_range(start, end.unwrap_or(-1));
    }
    let output = TextEditorTool::new(vfs).execute(&params);

    ViewReport {
        path: path.to_string(),
        error: output.starts_with("Error"),
        output,
    }
}

/// Runs the view command.
///
/// Text and pretty formats print the tool output as is; JSON wraps it in a
/// [`ViewReport`]. Exits with `TOOL_FAILED` when the view fails.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded.
pub async fn run(
    project: PathBuf,
    path: String,
    start: Option<i64>,
    end: Option<i64>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut vfs = load_project(&project).await?;
    let report = view(&mut vfs, &path, start, end);

    if output_format.is_machine_readable() {
        let formatted = format_output(&report, output_format).context("failed to format report")?;
        println!("{formatted}");
    } else if report.error {
        eprintln!("{}", report.output);
    } else {
        println!("{}", report.output);
    }

    Ok(ExitCode::on_failure(report.error, ExitCode::TOOL_FAILED))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> VirtualFileSystem {
        let mut vfs = VirtualFileSystem::new();
        vfs.create_file("/App.jsx", "one\ntwo\nthree").unwrap();
        vfs.create_file("/components/Card.jsx", "card").unwrap();
        vfs
    }

    #[test]
    fn test_view_file() {
        let report = view(&mut project(), "/App.jsx", None, None);
        assert!(!report.error);
        assert!(report.output.contains("     1\tone"));
        assert!(report.output.contains("     3\tthree"));
    }

    #[test]
    fn test_view_range_to_end() {
        let report = view(&mut project(), "/App.jsx", Some(2), None);
        assert!(!report.output.contains("\tone"));
        assert!(report.output.contains("     2\ttwo"));
        assert!(report.output.contains("     3\tthree"));
    }

    #[test]
    fn test_view_directory() {
        let report = view(&mut project(), "/", None, None);
        assert!(!report.error);
        assert!(report.output.contains("App.jsx"));
        assert!(report.output.contains("components"));
    }

    #[test]
    fn test_view_missing_file() {
        let report = view(&mut project(), "/Nope.jsx", None, None);
        assert!(report.error);
    }
}
