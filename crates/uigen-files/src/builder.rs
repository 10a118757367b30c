//! Builder pattern for constructing project file trees.
//!
//! Provides a fluent API for building a [`VirtualFileSystem`] from literal
//! files, e.g. for fixtures and project templates.
//!
//! # Examples
//!
//! ```
//! use uigen_files::FilesBuilder;
//!
//! let vfs = FilesBuilder::new()
//!     .add_file("/App.jsx", "export default function App() { return null; }")
//!     .add_file("/components/Card.jsx", "export default () => null;")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(vfs.file_count(), 2);
//! assert_eq!(vfs.refresh_count(), 0);
//! ```

use crate::tree::PathTree;
use crate::types::{FilePath, FilesError, Result};
use crate::vfs::VirtualFileSystem;

/// Builder for constructing a file tree.
///
/// Errors from individual additions are collected and the first one is
/// returned by [`FilesBuilder::build`]. The built file system starts with a
/// refresh counter of zero.
#[derive(Debug, Default)]
pub struct FilesBuilder {
    tree: PathTree,
    errors: Vec<FilesError>,
}

impl FilesBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilesBuilder;
    ///
    /// let vfs = FilesBuilder::new()
    ///     .add_file("/index.tsx", "export {}")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(vfs.read_file("/index.tsx"), Some("export {}"));
    /// ```
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<str>, content: impl Into<String>) -> Self {
        if let Err(e) = FilePath::new(path).and_then(|p| self.tree.insert_file(&p, content.into())) {
            self.errors.push(e);
        }
        self
    }

    /// Adds an empty directory.
    #[must_use]
    pub fn add_directory(mut self, path: impl AsRef<str>) -> Self {
        if let Err(e) = FilePath::new(path).and_then(|p| self.tree.insert_directory(&p)) {
            self.errors.push(e);
        }
        self
    }

    /// Adds multiple files at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilesBuilder;
    ///
    /// let files = vec![("/a.jsx", "a"), ("/b.jsx", "b")];
    /// let vfs = FilesBuilder::new().add_files(files).build().unwrap();
    /// assert_eq!(vfs.file_count(), 2);
    /// ```
    #[must_use]
    pub fn add_files<P, C>(mut self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        for (path, content) in files {
            self = self.add_file(path, content);
        }
        self
    }

    /// Consumes the builder and returns the file system.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilesBuilder;
    ///
    /// let result = FilesBuilder::new()
    ///     .add_file("/App.jsx", "a")
    ///     .add_file("/App.jsx", "b")
    ///     .build();
    ///
    /// assert!(result.unwrap_err().is_already_exists());
    /// ```
    pub fn build(self) -> Result<VirtualFileSystem> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(VirtualFileSystem::from_tree(self.tree))
    }

    /// Number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.tree.files().count()
    }
}
