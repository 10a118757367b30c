//! The authoritative in-memory project state.
//!
//! `VirtualFileSystem` owns a [`PathTree`] and layers content CRUD, listing,
//! whole-tree persistence and a refresh counter on top of it. Every public
//! path argument is normalized with [`FilePath::new`] first.
//!
//! # Examples
//!
//! ```
//! use uigen_files::VirtualFileSystem;
//!
//! let mut vfs = VirtualFileSystem::new();
//! vfs.create_file("/App.jsx", "export default function App() {}").unwrap();
//! vfs.rename("/App.jsx", "/src/App.jsx").unwrap();
//!
//! assert!(vfs.exists("/src"));
//! assert_eq!(vfs.refresh_count(), 2);
//! ```

use crate::tree::{Files, PathTree};
use crate::types::{
    DirEntry, FilePath, FileSet, FilesError, Node, NodeKind, Result, SerializedNode,
    SerializedNodes,
};
use std::collections::BTreeMap;
use tokio::sync::watch;
use tracing::{debug, info};

/// In-memory, path-addressed file tree with a change signal.
///
/// The refresh counter starts at zero and increments exactly once per
/// successful mutation. Failed operations never bump it.
///
/// # Thread Safety
///
/// Operations are synchronous and single-writer. Hosts sharing a VFS
/// between tasks wrap it in a lock.
#[derive(Debug)]
pub struct VirtualFileSystem {
    tree: PathTree,
    refresh: watch::Sender<u64>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VirtualFileSystem {
    /// Clones the tree; the clone gets its own counter starting at the
    /// current value.
    fn clone(&self) -> Self {
        let (refresh, _) = watch::channel(self.refresh_count());
        Self {
            tree: self.tree.clone(),
            refresh,
        }
    }
}

impl VirtualFileSystem {
    /// Creates an empty file system (root directory only).
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::VirtualFileSystem;
    ///
    /// let vfs = VirtualFileSystem::new();
    /// assert_eq!(vfs.file_count(), 0);
    /// assert_eq!(vfs.node_count(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_tree(PathTree::new())
    }

    pub(crate) fn from_tree(tree: PathTree) -> Self {
        let (refresh, _) = watch::channel(0);
        Self { tree, refresh }
    }

    /// Restores a file system from its persisted node map.
    ///
    /// # Errors
    ///
    /// Same as [`Self::deserialize_from_nodes`].
    pub fn from_nodes(nodes: &SerializedNodes) -> Result<Self> {
        build_tree(nodes).map(Self::from_tree)
    }

    /// Restores a file system from the persisted JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` when the payload is not a node map, plus the
    /// errors of [`Self::deserialize_from_nodes`].
    pub fn from_json(json: &str) -> Result<Self> {
        let nodes: SerializedNodes =
            serde_json::from_str(json).map_err(|e| FilesError::InvalidPath {
                path: "<payload>".to_string(),
                reason: format!("malformed node map: {e}"),
            })?;
        Self::from_nodes(&nodes)
    }

    /// Read-only access to the underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &PathTree {
        &self.tree
    }

    /// Creates a file, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if the path cannot be normalized
    /// - `AlreadyExists` if a file or directory is at the path
    /// - `NotADirectory` if an ancestor is a file
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::VirtualFileSystem;
    ///
    /// let mut vfs = VirtualFileSystem::new();
    /// vfs.create_file("/components/Button.jsx", "")?;
    ///
    /// let err = vfs.create_file("/components/Button.jsx", "again").unwrap_err();
    /// assert!(err.is_already_exists());
    /// assert_eq!(vfs.read_file("/components/Button.jsx"), Some(""));
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    pub fn create_file(&mut self, path: impl AsRef<str>, content: impl Into<String>) -> Result<()> {
        let path = FilePath::new(path)?;
        self.tree.insert_file(&path, content.into())?;
        debug!(path = %path, "created file");
        self.bump();
        Ok(())
    }

    /// Creates an empty directory, creating missing parents.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_file`].
    pub fn create_directory(&mut self, path: impl AsRef<str>) -> Result<()> {
        let path = FilePath::new(path)?;
        self.tree.insert_directory(&path)?;
        debug!(path = %path, "created directory");
        self.bump();
        Ok(())
    }

    /// Returns file content, or `None` for missing paths and directories.
    #[must_use]
    pub fn read_file(&self, path: impl AsRef<str>) -> Option<&str> {
        let path = FilePath::new(path).ok()?;
        self.tree
            .get(path.as_str())
            .filter(|node| node.is_file())
            .map(Node::content)
    }

    /// Returns `true` if a file or directory exists at the path.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<str>) -> bool {
        FilePath::new(path).is_ok_and(|p| self.tree.contains(p.as_str()))
    }

    /// Returns `true` if a directory exists at the path.
    #[must_use]
    pub fn is_directory(&self, path: impl AsRef<str>) -> bool {
        self.node(path).is_some_and(Node::is_directory)
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, path: impl AsRef<str>) -> Option<&Node> {
        let path = FilePath::new(path).ok()?;
        self.tree.get(path.as_str())
    }

    /// Replaces the content of an existing file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path is absent and `NotAFile` for
    /// directories.
    pub fn update_file(&mut self, path: impl AsRef<str>, content: impl Into<String>) -> Result<()> {
        let path = FilePath::new(path)?;
        self.tree.set_content(&path, content.into())?;
        debug!(path = %path, "updated file");
        self.bump();
        Ok(())
    }

    /// Moves a file or directory.
    ///
    /// Directories carry every descendant along, or nothing moves at all.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `old` is absent
    /// - `AlreadyExists` if `new` is occupied
    /// - `RootImmutable` if `old` is the root
    /// - `InvalidMove` if `new` lies inside `old`
    /// - `NotADirectory` if an ancestor of `new` is a file
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::VirtualFileSystem;
    ///
    /// let mut vfs = VirtualFileSystem::new();
    /// vfs.create_file("/a/child", "x")?;
    /// vfs.rename("/a", "/b")?;
    ///
    /// assert_eq!(vfs.read_file("/b/child"), Some("x"));
    /// assert!(!vfs.exists("/a"));
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    pub fn rename(&mut self, old: impl AsRef<str>, new: impl AsRef<str>) -> Result<()> {
        let old = FilePath::new(old)?;
        let new = FilePath::new(new)?;
        self.tree.move_node(&old, &new)?;
        debug!(from = %old, to = %new, "renamed");
        self.bump();
        Ok(())
    }

    /// Deletes a file, or a directory with everything under it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path is absent and `RootImmutable` for the
    /// root.
    pub fn delete(&mut self, path: impl AsRef<str>) -> Result<()> {
        let path = FilePath::new(path)?;
        let removed = self.tree.remove(&path)?;
        debug!(path = %path, removed, "deleted");
        self.bump();
        Ok(())
    }

    /// Lists the direct children of a directory.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path is absent and `NotADirectory` if it is a
    /// file.
    pub fn list_directory(&self, path: impl AsRef<str>) -> Result<Vec<DirEntry>> {
        let path = FilePath::new(path)?;
        self.tree.list(&path)
    }

    /// Iterates `(path, content)` of every file in path order.
    ///
    /// The iterator is `Clone`; cloning restarts from the clone point.
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        self.tree.files()
    }

    /// Iterates files strictly inside a directory, in path order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the directory path cannot be normalized.
    pub fn files_under(&self, dir: impl AsRef<str>) -> Result<Files<'_>> {
        let dir = FilePath::new(dir)?;
        Ok(self.tree.files_under(&dir))
    }

    /// Owned snapshot of every file for the preview pipeline.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::VirtualFileSystem;
    ///
    /// let mut vfs = VirtualFileSystem::new();
    /// vfs.create_file("/App.jsx", "x")?;
    /// vfs.create_directory("/empty")?;
    ///
    /// let files = vfs.get_all_files();
    /// assert_eq!(files.len(), 1);
    /// assert_eq!(files.get("/App.jsx"), Some("x"));
    /// # Ok::<(), uigen_files::FilesError>(())
    /// ```
    #[must_use]
    pub fn get_all_files(&self) -> FileSet {
        let mut set = FileSet::new();
        for (path, content) in self.files() {
            set.insert(path.clone(), content);
        }
        set
    }

    /// Serializes every node, directories included.
    #[must_use]
    pub fn serialize(&self) -> SerializedNodes {
        self.tree
            .nodes()
            .map(|node| (node.path().to_string(), SerializedNode::from(node)))
            .collect()
    }

    /// Serializes to the persisted JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if JSON encoding fails, which a well-formed tree
    /// never triggers.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.serialize()).map_err(|e| FilesError::InvalidPath {
            path: "<payload>".to_string(),
            reason: format!("failed to encode node map: {e}"),
        })
    }

    /// Replaces the whole tree with a persisted node map.
    ///
    /// Hierarchy is rebuilt from paths alone; keys are normalized, may come in
    /// any order, and missing intermediate directories are synthesized. On
    /// error the current tree is left untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for keys that cannot be normalized or a root file
    /// - `NotADirectory` when a file path is used as a directory by another
    ///   entry
    pub fn deserialize_from_nodes(&mut self, nodes: &SerializedNodes) -> Result<()> {
        self.tree = build_tree(nodes)?;
        info!(files = self.file_count(), "restored file tree");
        self.bump();
        Ok(())
    }

    /// Drops every file and directory except the root.
    pub fn reset(&mut self) {
        self.tree.clear();
        debug!("reset file tree");
        self.bump();
    }

    /// Current value of the refresh counter.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        *self.refresh.borrow()
    }

    /// Subscribes to refresh counter bumps.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_files::VirtualFileSystem;
    ///
    /// let mut vfs = VirtualFileSystem::new();
    /// let mut rx = vfs.subscribe();
    /// vfs.create_file("/App.jsx", "").unwrap();
    ///
    /// assert!(rx.has_changed().unwrap());
    /// assert_eq!(*rx.borrow_and_update(), 1);
    /// ```
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    /// Number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    fn bump(&self) {
        self.refresh.send_modify(|count| *count += 1);
    }
}

fn build_tree(nodes: &SerializedNodes) -> Result<PathTree> {
    let mut normalized: BTreeMap<FilePath, &SerializedNode> = BTreeMap::new();
    for (key, node) in nodes {
        normalized.insert(FilePath::new(key)?, node);
    }

    // Path order puts every directory before anything inside it.
    let mut tree = PathTree::new();
    for (path, node) in normalized {
        match node.kind {
            NodeKind::Directory => {
                tree.ensure_directory(&path)?;
            }
            NodeKind::File if path.is_root() => {
                return Err(FilesError::InvalidPath {
                    path: path.to_string(),
                    reason: "the root must be a directory".to_string(),
                });
            }
            NodeKind::File => {
                let content = node.content.clone().unwrap_or_default();
                tree.insert_file(&path, content)
                    .map_err(|err| match err {
                        FilesError::AlreadyExists { path } => FilesError::NotADirectory { path },
                        other => other,
                    })?;
            }
        }
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VirtualFileSystem {
        let mut vfs = VirtualFileSystem::new();
        vfs.create_file("/App.jsx", "import Button from './components/Button';")
            .unwrap();
        vfs.create_file("/components/Button.jsx", "export default () => null;")
            .unwrap();
        vfs.create_file("/styles/main.css", "body { margin: 0; }")
            .unwrap();
        vfs
    }

    #[test]
    fn test_vfs_new() {
        let vfs = VirtualFileSystem::new();
        assert_eq!(vfs.file_count(), 0);
        assert_eq!(vfs.refresh_count(), 0);
        assert!(vfs.exists("/"));
    }

    #[test]
    fn test_create_and_read() {
        let vfs = sample();
        assert_eq!(vfs.read_file("/styles/main.css"), Some("body { margin: 0; }"));
        assert_eq!(vfs.read_file("styles//main.css"), Some("body { margin: 0; }"));
        assert_eq!(vfs.read_file("/components"), None);
        assert_eq!(vfs.read_file("/missing.jsx"), None);
        assert!(vfs.is_directory("/components"));
    }

    #[test]
    fn test_refresh_counts_successes_only() {
        let mut vfs = VirtualFileSystem::new();
        vfs.create_file("/a.jsx", "").unwrap();
        assert_eq!(vfs.refresh_count(), 1);

        assert!(vfs.create_file("/a.jsx", "").is_err());
        assert!(vfs.update_file("/missing.jsx", "").is_err());
        assert!(vfs.delete("/missing.jsx").is_err());
        assert!(vfs.rename("/", "/x").is_err());
        assert_eq!(vfs.refresh_count(), 1);

        vfs.update_file("/a.jsx", "x").unwrap();
        vfs.rename("/a.jsx", "/b.jsx").unwrap();
        vfs.delete("/b.jsx").unwrap();
        assert_eq!(vfs.refresh_count(), 4);
    }

    #[test]
    fn test_update_directory_is_not_a_file() {
        let mut vfs = sample();
        let err = vfs.update_file("/components", "x").unwrap_err();
        assert!(err.is_not_file());
    }

    #[test]
    fn test_delete_directory_recursively() {
        let mut vfs = sample();
        vfs.delete("/components").unwrap();
        assert!(!vfs.exists("/components/Button.jsx"));
        assert_eq!(vfs.file_count(), 2);
    }

    #[test]
    fn test_delete_root_is_rejected() {
        let mut vfs = sample();
        assert!(vfs.delete("/").unwrap_err().is_root_immutable());
    }

    #[test]
    fn test_serialize_includes_directories() {
        let vfs = sample();
        let nodes = vfs.serialize();
        assert_eq!(nodes.len(), 6);
        assert_eq!(nodes["/components"].kind, NodeKind::Directory);
        assert_eq!(nodes["/components"].content, None);
        assert_eq!(nodes["/App.jsx"].name.as_deref(), Some("App.jsx"));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let vfs = sample();
        let restored = VirtualFileSystem::from_nodes(&vfs.serialize()).unwrap();
        assert_eq!(restored.serialize(), vfs.serialize());
    }

    #[test]
    fn test_deserialize_synthesizes_directories() {
        let mut nodes = SerializedNodes::new();
        nodes.insert("deep/nested/File.jsx".to_string(), SerializedNode::file("x"));

        let vfs = VirtualFileSystem::from_nodes(&nodes).unwrap();
        assert!(vfs.is_directory("/deep/nested"));
        assert_eq!(vfs.read_file("/deep/nested/File.jsx"), Some("x"));
    }

    #[test]
    fn test_deserialize_file_used_as_directory() {
        let mut vfs = sample();
        let before = vfs.serialize();

        let mut nodes = SerializedNodes::new();
        nodes.insert("/a".to_string(), SerializedNode::file("x"));
        nodes.insert("/a/b.jsx".to_string(), SerializedNode::file("y"));

        let err = vfs.deserialize_from_nodes(&nodes).unwrap_err();
        assert!(err.is_not_directory());
        assert_eq!(vfs.serialize(), before);
    }

    #[test]
    fn test_deserialize_replaces_tree() {
        let mut vfs = sample();
        let count = vfs.refresh_count();

        let mut nodes = SerializedNodes::new();
        nodes.insert("/index.jsx".to_string(), SerializedNode::file(""));
        vfs.deserialize_from_nodes(&nodes).unwrap();

        assert_eq!(vfs.file_count(), 1);
        assert!(!vfs.exists("/App.jsx"));
        assert_eq!(vfs.refresh_count(), count + 1);
    }

    #[test]
    fn test_json_round_trip() {
        let vfs = sample();
        let json = vfs.to_json().unwrap();
        let restored = VirtualFileSystem::from_json(&json).unwrap();
        assert_eq!(restored.get_all_files(), vfs.get_all_files());
        assert!(VirtualFileSystem::from_json("[]").unwrap_err().is_invalid_path());
    }

    #[test]
    fn test_reset() {
        let mut vfs = sample();
        vfs.reset();
        assert_eq!(vfs.node_count(), 1);
        assert_eq!(vfs.refresh_count(), 4);
    }

    #[test]
    fn test_files_under() {
        let vfs = sample();
        let paths: Vec<_> = vfs
            .files_under("/components")
            .unwrap()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(paths, vec!["/components/Button.jsx"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let vfs = sample();
        let mut copy = vfs.clone();
        copy.delete("/App.jsx").unwrap();
        assert!(vfs.exists("/App.jsx"));
        assert_eq!(copy.refresh_count(), vfs.refresh_count() + 1);
    }

    #[tokio::test]
    async fn test_subscribe_observes_bumps() {
        let mut vfs = VirtualFileSystem::new();
        let mut rx = vfs.subscribe();

        vfs.create_file("/App.jsx", "").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[test]
    fn test_vfs_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VirtualFileSystem>();
        assert_sync::<VirtualFileSystem>();
    }
}
