//! Core types for the project file tree.
//!
//! This module defines normalized paths, nodes, directory entries, the
//! persisted node shape and the error taxonomy shared by every tree
//! operation.
//!
//! # Examples
//!
//! ```
//! use uigen_files::{FilePath, NodeKind};
//!
//! let path = FilePath::new("components//./Button.jsx").unwrap();
//! assert_eq!(path.as_str(), "/components/Button.jsx");
//! assert_eq!(path.file_name(), Some("Button.jsx"));
//! assert_eq!(NodeKind::File.as_str(), "file");
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during file tree operations.
///
/// All error variants include contextual information and implement
/// `is_xxx()` methods for easy error classification.
///
/// # Examples
///
/// ```
/// use uigen_files::FilesError;
///
/// let error = FilesError::NotFound {
///     path: "/missing.jsx".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilesError {
    /// No node exists at the path
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// A node already exists at the path
    #[error("File already exists: {path}")]
    AlreadyExists {
        /// The occupied path
        path: String,
    },

    /// Path is empty or contains forbidden characters
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The rejected input
        path: String,
        /// Why the path was rejected
        reason: String,
    },

    /// Path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory
        path: String,
    },

    /// Path exists but is not a file
    #[error("Not a file: {path}")]
    NotAFile {
        /// The path that is a directory
        path: String,
    },

    /// The root directory cannot be renamed or deleted
    #[error("The root directory cannot be modified")]
    RootImmutable,

    /// A directory cannot be moved into its own subtree
    #[error("Cannot move {from} into its own subtree at {to}")]
    InvalidMove {
        /// Source path
        from: String,
        /// Destination path inside the source
        to: String,
    },

    /// Writing the tree to a real directory failed
    #[error("Export failed at {path}: {message}")]
    ExportFailed {
        /// Disk path that failed
        path: String,
        /// Underlying I/O failure
        message: String,
    },
}

impl FilesError {
    /// Returns `true` if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already-exists error.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilesError;
    ///
    /// let error = FilesError::AlreadyExists {
    ///     path: "/App.jsx".to_string(),
    /// };
    /// assert!(error.is_already_exists());
    /// assert!(!error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is a not-a-directory error.
    #[must_use]
    pub const fn is_not_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` if this is a not-a-file error.
    #[must_use]
    pub const fn is_not_file(&self) -> bool {
        matches!(self, Self::NotAFile { .. })
    }

    /// Returns `true` if the operation targeted the root directory.
    #[must_use]
    pub const fn is_root_immutable(&self) -> bool {
        matches!(self, Self::RootImmutable)
    }

    /// Returns `true` if a directory was moved into itself.
    #[must_use]
    pub const fn is_invalid_move(&self) -> bool {
        matches!(self, Self::InvalidMove { .. })
    }

    /// Returns `true` if exporting to disk failed.
    #[must_use]
    pub const fn is_export_failed(&self) -> bool {
        matches!(self, Self::ExportFailed { .. })
    }
}

/// Type alias for file tree operation results.
pub type Result<T> = std::result::Result<T, FilesError>;

/// A normalized, absolute project path.
///
/// Normalization rules:
/// - empty or NUL-containing input is rejected
/// - backslashes become `/` and a leading `/` is added when missing
/// - repeated separators collapse and `.` segments are dropped
/// - `..` pops one segment and is clamped at the root
/// - trailing separators are removed (except for the root `/`)
///
/// Paths order lexicographically, so every subtree is a contiguous range.
///
/// # Examples
///
/// ```
/// use uigen_files::FilePath;
///
/// assert_eq!(FilePath::new("a/b/../c").unwrap().as_str(), "/a/c");
/// assert_eq!(FilePath::new("/../../etc").unwrap().as_str(), "/etc");
/// assert_eq!(FilePath::new("\\src\\App.jsx").unwrap().as_str(), "/src/App.jsx");
/// assert!(FilePath::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilePath(String);

impl FilePath {
    /// Creates a normalized path.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidPath` if the input is empty or contains
    /// a NUL byte.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref();

        if raw.is_empty() {
            return Err(FilesError::InvalidPath {
                path: String::new(),
                reason: "path is empty".to_string(),
            });
        }

        if raw.contains('\0') {
            return Err(FilesError::InvalidPath {
                path: raw.replace('\0', "\\0"),
                reason: "path contains a NUL byte".to_string(),
            });
        }

        let unified = raw.replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }

        Ok(Self::from_segments(&segments))
    }

    /// The root directory `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    fn from_segments(segments: &[&str]) -> Self {
        if segments.is_empty() {
            Self::root()
        } else {
            Self(format!("/{}", segments.join("/")))
        }
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root directory.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the parent directory, or `None` for the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilePath;
    ///
    /// let path = FilePath::new("/components/ui/Button.jsx")?;
    /// assert_eq!(path.parent().unwrap().as_str(), "/components/ui");
    /// assert_eq!(FilePath::new("/App.jsx")?.parent().unwrap().as_str(), "/");
    /// assert!(FilePath::root().parent().is_none());
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(pos) => Some(Self(self.0[..pos].to_string())),
            None => None,
        }
    }

    /// Returns all proper ancestors, nearest first, ending with the root.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(dir) = current {
            current = dir.parent();
            out.push(dir);
        }
        out
    }

    /// Returns the last segment, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }

    /// Returns the extension without its dot.
    ///
    /// Dotfiles such as `/.env` have no extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilePath;
    ///
    /// assert_eq!(FilePath::new("/App.jsx")?.extension(), Some("jsx"));
    /// assert_eq!(FilePath::new("/.env")?.extension(), None);
    /// assert_eq!(FilePath::new("/components")?.extension(), None);
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(pos) => Some(&name[pos + 1..]),
        }
    }

    /// Returns the path with its extension removed.
    #[must_use]
    pub fn without_extension(&self) -> &str {
        match self.extension() {
            Some(ext) => &self.0[..self.0.len() - ext.len() - 1],
            None => &self.0,
        }
    }

    /// Resolves `relative` against this directory.
    ///
    /// An absolute `relative` replaces this path entirely.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidPath` for empty or NUL-containing input.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilePath;
    ///
    /// let dir = FilePath::new("/components")?;
    /// assert_eq!(dir.join("../lib/utils.js")?.as_str(), "/lib/utils.js");
    /// assert_eq!(dir.join("/App.jsx")?.as_str(), "/App.jsx");
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    pub fn join(&self, relative: impl AsRef<str>) -> Result<Self> {
        let relative = relative.as_ref();
        if relative.starts_with('/') || relative.starts_with('\\') {
            return Self::new(relative);
        }
        if relative.is_empty() {
            return Err(FilesError::InvalidPath {
                path: String::new(),
                reason: "path is empty".to_string(),
            });
        }
        Self::new(format!("{}/{relative}", self.0))
    }

    /// Returns `true` if `other` lies strictly inside this directory.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    /// Returns the path relative to `base`, without a leading separator.
    ///
    /// Returns `None` unless `base` equals this path or is an ancestor of it.
    #[must_use]
    pub fn strip_prefix(&self, base: &Self) -> Option<&str> {
        if self == base {
            Some("")
        } else if base.is_ancestor_of(self) {
            let offset = if base.is_root() { 1 } else { base.0.len() + 1 };
            Some(&self.0[offset..])
        } else {
            None
        }
    }

    /// Moves this path from under `old_root` to under `new_root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::FilePath;
    ///
    /// let child = FilePath::new("/a/child/x.jsx")?;
    /// let moved = child
    ///     .rebase(&FilePath::new("/a")?, &FilePath::new("/b")?)
    ///     .unwrap();
    /// assert_eq!(moved.as_str(), "/b/child/x.jsx");
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    #[must_use]
    pub fn rebase(&self, old_root: &Self, new_root: &Self) -> Option<Self> {
        let rest = self.strip_prefix(old_root)?;
        if rest.is_empty() {
            Some(new_root.clone())
        } else if new_root.is_root() {
            Some(Self(format!("/{rest}")))
        } else {
            Some(Self(format!("{}/{rest}", new_root.0)))
        }
    }

    /// Number of segments below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches('/').count()
        }
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FilePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FilePath {
    type Error = FilesError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for FilePath {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Regular file with text content
    File,
    /// Directory with children
    Directory,
}

impl NodeKind {
    /// Returns the persisted name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file or directory in the tree.
///
/// Directories never carry content; files never have children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    path: FilePath,
    kind: NodeKind,
    content: String,
    children: BTreeSet<FilePath>,
}

impl Node {
    pub(crate) fn file(path: FilePath, content: String) -> Self {
        Self {
            path,
            kind: NodeKind::File,
            content,
            children: BTreeSet::new(),
        }
    }

    pub(crate) fn directory(path: FilePath) -> Self {
        Self {
            path,
            kind: NodeKind::Directory,
            content: String::new(),
            children: BTreeSet::new(),
        }
    }

    /// Absolute path of the node.
    #[must_use]
    pub fn path(&self) -> &FilePath {
        &self.path
    }

    /// Last path segment, `/` for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or("/")
    }

    /// Node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` for files.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    /// File content; empty for directories.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Child paths in sorted order; empty for files.
    pub fn children(&self) -> impl Iterator<Item = &FilePath> {
        self.children.iter()
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn attach(&mut self, child: FilePath) {
        self.children.insert(child);
    }

    pub(crate) fn detach(&mut self, child: &FilePath) {
        self.children.remove(child);
    }

    pub(crate) fn relocate(mut self, old_root: &FilePath, new_root: &FilePath) -> Self {
        if let Some(path) = self.path.rebase(old_root, new_root) {
            self.path = path;
        }
        self.children = self
            .children
            .iter()
            .filter_map(|child| child.rebase(old_root, new_root))
            .collect();
        self
    }
}

/// A direct child of a directory, as shown by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// Last path segment
    pub name: String,
    /// Absolute path
    pub path: FilePath,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// Persisted form of a single node.
///
/// Only `type` is required when deserializing; the map key is the
/// authoritative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedNode {
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Last path segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Absolute path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File content (files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SerializedNode {
    /// Persisted file entry without name/path metadata.
    #[must_use]
    pub fn file(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::File,
            name: None,
            path: None,
            content: Some(content.into()),
        }
    }

    /// Persisted directory entry without name/path metadata.
    #[must_use]
    pub const fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            name: None,
            path: None,
            content: None,
        }
    }
}

impl From<&Node> for SerializedNode {
    fn from(node: &Node) -> Self {
        Self {
            kind: node.kind,
            name: Some(node.name().to_string()),
            path: Some(node.path.to_string()),
            content: node.is_file().then(|| node.content.clone()),
        }
    }
}

/// Flat persisted tree: path → node.
pub type SerializedNodes = BTreeMap<String, SerializedNode>;

/// Owned snapshot of every file in the tree (`path → content`).
///
/// This is what the preview pipeline reads; it never sees directories.
///
/// # Examples
///
/// ```
/// use uigen_files::FileSet;
///
/// let files: FileSet = [("/App.jsx", "export default 1")].into_iter().collect();
/// assert_eq!(files.get("/App.jsx"), Some("export default 1"));
/// assert!(files.contains("/App.jsx"));
/// assert_eq!(files.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileSet {
    files: BTreeMap<FilePath, String>,
}

impl FileSet {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: FilePath, content: impl Into<String>) {
        self.files.insert(path, content.into());
    }

    /// Looks up file content by normalized path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Returns `true` if a file exists at the normalized path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Iterates `(path, content)` in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&FilePath, &str)> {
        self.files.iter().map(|(path, content)| (path, content.as_str()))
    }

    /// Iterates paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &FilePath> {
        self.files.keys()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if there are no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P, C> FromIterator<(P, C)> for FileSet
where
    P: AsRef<str>,
    C: Into<String>,
{
    /// Collects `(path, content)` pairs, skipping invalid paths.
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (path, content) in iter {
            if let Ok(path) = FilePath::new(path) {
                set.insert(path, content);
            }
        }
        set
    }
}
