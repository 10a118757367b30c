//! Init command implementation.
//!
//! Creates a project file seeded from a starter. The starter is built with
//! the same tool calls an agent would make.

use super::common::save_project;
use crate::formatters::format_output;
use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use uigen_core::cli::{ExitCode, OutputFormat};
use uigen_files::VirtualFileSystem;
use uigen_tools::Starter;

/// Result of creating a project.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitReport {
    /// Project file written
    pub project: PathBuf,
    /// Starter used
    pub starter: String,
    /// Files in the new project
    pub files: Vec<String>,
}

/// Builds a project from `starter` and writes it to `project`.
///
/// # Errors
///
/// Returns an error if the project exists and `force` is off, or if the
/// starter's tool calls fail.
pub async fn create(project: &Path, starter: Starter, force: bool) -> Result<InitReport> {
    if project.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            project.display()
        );
    }

    let mut vfs = VirtualFileSystem::new();
    if let Some(failed) = starter.apply(&mut vfs).into_iter().find(|out| out.is_error()) {
        bail!("starter '{starter}' failed: {failed}");
    }
    save_project(project, &vfs).await?;
    info!(project = %project.display(), %starter, "created project");

    Ok(InitReport {
        project: project.to_path_buf(),
        starter: starter.to_string(),
        files: vfs.files().map(|(path, _)| path.to_string()).collect(),
    })
}

/// Runs the init command.
///
/// # Errors
///
/// Returns an error for unknown starters and the failures of [`create`].
pub async fn run(
    project: PathBuf,
    starter: String,
    force: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let starter: Starter = starter.parse().map_err(|e: String| anyhow!(e))?;
    let report = create(&project, starter, force).await?;

    let formatted = format_output(&report, output_format).context("failed to format report")?;
    println!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::load_project;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_counter() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");

        let report = create(&path, Starter::Counter, false).await.unwrap();
        assert_eq!(report.starter, "counter");
        assert!(report.files.contains(&"/App.jsx".to_string()));
        assert!(report.files.contains(&"/components/Counter.jsx".to_string()));

        let vfs = load_project(&path).await.unwrap();
        assert_eq!(vfs.file_count(), 2);
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.json");
        create(&path, Starter::Blank, false).await.unwrap();

        let err = create(&path, Starter::Card, false).await.unwrap_err();
        assert!(err.to_string().contains("--force"));

        let report = create(&path, Starter::Card, true).await.unwrap();
        assert!(report.files.contains(&"/components/Card.jsx".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_starter() {
        let temp = TempDir::new().unwrap();
        let result = run(
            temp.path().join("p.json"),
            "kanban".to_string(),
            false,
            OutputFormat::Json,
        )
        .await;
        assert!(result.unwrap_err().to_string().contains("Unknown starter"));
    }
}
