//! Export command implementation.
//!
//! Writes the project tree to a real directory so regular tooling can
//! pick it up.

use super::common::load_project;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_files::ExportOptions;

/// Result of an export.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExportReport {
    /// Target directory
    pub dir: PathBuf,
    /// Files written
    pub written: usize,
    /// Files in the project
    pub files: usize,
}

/// Exports `project` into `dir`, creating `dir` if needed.
///
/// With `overwrite` off, files that already exist on disk are kept and not
/// counted as written.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded or any file cannot be
/// written.
pub async fn export(project: &Path, dir: &Path, overwrite: bool) -> Result<ExportReport> {
    let vfs = load_project(project).await?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let files = vfs.file_count();
    let base = dir.to_path_buf();
    let options = ExportOptions::default().with_overwrite(overwrite);
    let written = tokio::task::spawn_blocking(move || vfs.export_to_directory(&base, &options))
        .await
        .context("export task panicked")?
        .with_context(|| format!("failed to export to {}", dir.display()))?;

    info!(dir = %dir.display(), written, "exported project");
    Ok(ExportReport {
        dir: dir.to_path_buf(),
        written,
        files,
    })
}

/// Runs the export command.
///
/// # Errors
///
/// Same as [`export`].
pub async fn run(
    project: PathBuf,
    dir: PathBuf,
    no_overwrite: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let report = export(&project, &dir, !no_overwrite).await?;
    let formatted = format_output(&report, output_format).context("failed to format report")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}
