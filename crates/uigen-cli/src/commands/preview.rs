//! Preview command implementation.
//!
//! Builds the preview document for a project and writes it to disk. The
//! document is self-contained: every module is inlined as a `data:` URL.

use super::common::{load_config, load_project};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_core::{PreviewConfig, Theme};
use uigen_files::VirtualFileSystem;
use uigen_preview::{Diagnostic, PreviewSession, PreviewUpdate};

/// Result of rendering a preview.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    /// Preview state (`welcome`, `no_files`, `no_component`, `ready`)
    pub state: String,
    /// Entry module, when one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Where the document was written
    pub output: PathBuf,
    /// Build generation
    pub generation: u64,
    /// Problems found while building
    pub diagnostics: Vec<Diagnostic>,
}

impl PreviewReport {
    fn new(update: PreviewUpdate, output: PathBuf) -> Self {
        Self {
            state: update.state.as_str().to_string(),
            entry: update.entry.map(|entry| entry.to_string()),
            output,
            generation: update.generation,
            diagnostics: update.diagnostics,
        }
    }
}

/// Default output path: the project path with an `.html` extension.
#[must_use]
pub fn default_output(project: &Path) -> PathBuf {
    project.with_extension("html")
}

/// Builds the preview of `vfs`.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be created or a document cannot
/// be rendered.
pub fn render(vfs: &VirtualFileSystem, config: PreviewConfig, theme: Theme) -> Result<PreviewUpdate> {
    let mut session = PreviewSession::new(config).context("failed to create preview pipeline")?;
    session.set_theme(theme);
    let update = session
        .refresh(&vfs.get_all_files(), vfs.refresh_count())
        .context("failed to render preview")?;
    Ok(update)
}

/// Runs the preview command.
///
/// Exits with `PREVIEW_DIAGNOSTICS` when the build reported problems.
///
/// # Errors
///
/// Returns an error if the project or configuration cannot be loaded, or
/// the document cannot be rendered or written.
pub async fn run(
    project: PathBuf,
    output: Option<PathBuf>,
    dark: bool,
    config: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let vfs = load_project(&project).await?;
    let config = load_config(config.as_deref())?;
    let update = render(&vfs, config, Theme::from_dark_flag(dark))?;

    let output = output.unwrap_or_else(|| default_output(&project));
    tokio::fs::write(&output, &update.html)
        .await
        .with_context(|| format!("failed to write preview to {}", output.display()))?;
    info!(
        output = %output.display(),
        state = update.state.as_str(),
        "wrote preview"
    );

    let report = PreviewReport::new(update, output);
    let formatted = format_output(&report, output_format).context("failed to format report")?;
    println!("{formatted}");

    Ok(ExitCode::on_failure(
        !report.diagnostics.is_empty(),
        ExitCode::PREVIEW_DIAGNOSTICS,
    ))
}
