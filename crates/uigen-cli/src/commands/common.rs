//! Common utilities shared across CLI commands.
//!
//! Loading and saving project files, and resolving the preview
//! configuration.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::debug;
use uigen_core::PreviewConfig;
use uigen_files::VirtualFileSystem;

/// Loads a project file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not a valid
/// node map.
///
/// # Examples
///
/// ```
/// use uigen_cli::commands::common::{load_project, save_project};
/// use uigen_files::VirtualFileSystem;
/// # use tempfile::TempDir;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// # let temp = TempDir::new()?;
/// let path = temp.path().join("project.json");
///
/// let mut vfs = VirtualFileSystem::new();
/// vfs.create_file("/App.jsx", "export default 1;")?;
/// save_project(&path, &vfs).await?;
///
/// let loaded = load_project(&path).await?;
/// assert_eq!(loaded.read_file("/App.jsx"), Some("export default 1;"));
/// # Ok(())
/// # }
/// ```
pub async fn load_project(path: &Path) -> Result<VirtualFileSystem> {
    if !path.exists() {
        bail!(
            "project file {} not found (create it with `uigen init`)",
            path.display()
        );
    }
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read project file {}", path.display()))?;
    let vfs = VirtualFileSystem::from_json(&json)
        .with_context(|| format!("invalid project file {}", path.display()))?;
    debug!(path = %path.display(), files = vfs.file_count(), "loaded project");
    Ok(vfs)
}

/// Writes a project file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_project(path: &Path, vfs: &VirtualFileSystem) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let json = vfs.to_json()?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write project file {}", path.display()))?;
    debug!(path = %path.display(), "saved project");
    Ok(())
}

/// Resolves the preview configuration.
///
/// An explicit `path` must exist; otherwise the user configuration file is
/// used when present, and defaults when not.
///
/// # Errors
///
/// Returns an error if a configuration file exists but is invalid.
pub fn load_config(path: Option<&Path>) -> Result<PreviewConfig> {
    let config = match path {
        Some(path) => PreviewConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PreviewConfig::load_or_default().context("failed to load user config")?,
    };
    Ok(config)
}
