//! Writing the project tree to a real directory.
//!
//! Used by the CLI to hand a generated project to regular tooling. Every
//! directory node is created first, then files are written one by one.
//!
//! # Examples
//!
//! ```
//! use uigen_files::{ExportOptions, FilesBuilder};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let vfs = FilesBuilder::new()
//!     .add_file("/App.jsx", "export default function App() {}")
//!     .add_file("/components/Card.jsx", "export default () => null;")
//!     .build()
//!     .unwrap();
//!
//! let written = vfs.export_to_directory(temp.path(), &ExportOptions::default()).unwrap();
//! assert_eq!(written, 2);
//! assert!(temp.path().join("components/Card.jsx").exists());
//! ```

use crate::types::{FilesError, Result};
use crate::vfs::VirtualFileSystem;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for directory export.
///
/// # Examples
///
/// ```
/// use uigen_files::ExportOptions;
///
/// let options = ExportOptions::default().with_overwrite(false);
/// assert!(options.atomic);
/// assert!(!options.overwrite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write to a temporary sibling, then rename into place
    pub atomic: bool,
    /// Replace files that already exist on disk
    pub overwrite: bool,
}

impl ExportOptions {
    /// Defaults: atomic writes, overwrite existing files.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            atomic: true,
            overwrite: true,
        }
    }

    /// Sets whether to use atomic writes.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Sets whether to overwrite existing files.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem {
    /// Writes every directory and file under `base`.
    ///
    /// Returns the number of files written. Skipped files (existing, with
    /// `overwrite` off) are not counted.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::ExportFailed` if `base` is missing or any
    /// directory or file cannot be written.
    pub fn export_to_directory(
        &self,
        base: impl AsRef<Path>,
        options: &ExportOptions,
    ) -> Result<usize> {
        let base = base.as_ref();
        if !base.is_dir() {
            return Err(export_error(base, "base directory does not exist"));
        }

        for node in self.tree().nodes().filter(|node| node.is_directory()) {
            let dir = disk_path(base, node.path().as_str());
            fs::create_dir_all(&dir).map_err(|e| export_error(&dir, e))?;
        }

        let mut written = 0;
        for (path, content) in self.files() {
            let target = disk_path(base, path.as_str());
            if write_file(&target, content, options)? {
                written += 1;
            }
        }

        debug!(base = %base.display(), written, "exported file tree");
        Ok(written)
    }
}

fn disk_path(base: &Path, vfs_path: &str) -> PathBuf {
    vfs_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}

fn write_file(path: &Path, content: &str, options: &ExportOptions) -> Result<bool> {
    if !options.overwrite && path.exists() {
        return Ok(false);
    }

    if options.atomic {
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".uigen-tmp");
        let temp_path = path.with_file_name(temp_name);

        let mut file = fs::File::create(&temp_path).map_err(|e| export_error(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| export_error(&temp_path, e))?;
        file.sync_all().map_err(|e| export_error(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| export_error(path, e))?;
    } else {
        fs::write(path, content).map_err(|e| export_error(path, e))?;
    }

    Ok(true)
}

fn export_error(path: &Path, message: impl ToString) -> FilesError {
    FilesError::ExportFailed {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
