//! Ordered node store keyed by normalized path.
//!
//! `PathTree` keeps the structural invariants of the project tree: every
//! non-root node has a directory parent, directories carry no content, and
//! the root always exists. It knows nothing about what file content means.
//!
//! Every mutating method validates completely before touching the store, so
//! a failed call leaves the tree exactly as it was.

use crate::types::{DirEntry, FilePath, FilesError, Node, Result};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

/// Ordered store of files and directories.
///
/// # Examples
///
/// ```
/// use uigen_files::{FilePath, PathTree};
///
/// let mut tree = PathTree::new();
/// tree.insert_file(&FilePath::new("/components/Button.jsx")?, "x".to_string())?;
///
/// assert!(tree.get("/components").unwrap().is_directory());
/// assert_eq!(tree.len(), 3);
/// # Ok::<(), uigen_files::FilesError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTree {
    nodes: BTreeMap<FilePath, Node>,
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTree {
    /// Creates a tree containing only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(FilePath::root(), Node::directory(FilePath::root()));
        Self { nodes }
    }

    /// Looks up a node by normalized path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    /// Returns `true` if any node exists at the path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Total number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Iterates every node in path order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates files in path order.
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files {
            inner: self.nodes.range::<str, _>(..),
            prefix: None,
        }
    }

    /// Iterates files strictly inside `dir`, in path order.
    #[must_use]
    pub fn files_under<'a>(&'a self, dir: &FilePath) -> Files<'a> {
        if dir.is_root() {
            return self.files();
        }
        let prefix = format!("{dir}/");
        Files {
            inner: self
                .nodes
                .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded)),
            prefix: Some(prefix),
        }
    }

    /// Direct children of a directory, in path order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path is absent and `NotADirectory` if it is a
    /// file.
    pub fn list(&self, dir: &FilePath) -> Result<Vec<DirEntry>> {
        let node = self.nodes.get(dir).ok_or_else(|| FilesError::NotFound {
            path: dir.to_string(),
        })?;
        if !node.is_directory() {
            return Err(FilesError::NotADirectory {
                path: dir.to_string(),
            });
        }

        Ok(node
            .children()
            .filter_map(|child| self.nodes.get(child))
            .map(|child| DirEntry {
                name: child.name().to_string(),
                path: child.path().clone(),
                kind: child.kind(),
            })
            .collect())
    }

    /// Inserts a file, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if any node occupies the path and
    /// `NotADirectory` if an ancestor is a file.
    pub fn insert_file(&mut self, path: &FilePath, content: String) -> Result<()> {
        self.check_vacant(path)?;
        self.ensure_parents(path)?;
        self.link(Node::file(path.clone(), content));
        Ok(())
    }

    /// Inserts an empty directory, creating missing parents.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if any node occupies the path and
    /// `NotADirectory` if an ancestor is a file.
    pub fn insert_directory(&mut self, path: &FilePath) -> Result<()> {
        self.check_vacant(path)?;
        self.ensure_parents(path)?;
        self.link(Node::directory(path.clone()));
        Ok(())
    }

    /// Makes sure a directory exists at the path, creating it and its parents
    /// as needed. Returns `true` if anything was created.
    ///
    /// # Errors
    ///
    /// Returns `NotADirectory` if the path or an ancestor is a file.
    pub fn ensure_directory(&mut self, path: &FilePath) -> Result<bool> {
        match self.nodes.get(path) {
            Some(node) if node.is_directory() => Ok(false),
            Some(_) => Err(FilesError::NotADirectory {
                path: path.to_string(),
            }),
            None => {
                self.ensure_parents(path)?;
                self.link(Node::directory(path.clone()));
                Ok(true)
            }
        }
    }

    /// Replaces the content of an existing file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path is absent and `NotAFile` for
    /// directories.
    pub fn set_content(&mut self, path: &FilePath, content: String) -> Result<()> {
        let node = self
            .nodes
            .get_mut(path)
            .ok_or_else(|| FilesError::NotFound {
                path: path.to_string(),
            })?;
        if !node.is_file() {
            return Err(FilesError::NotAFile {
                path: path.to_string(),
            });
        }
        node.set_content(content);
        Ok(())
    }

    /// Removes a node and, for directories, its whole subtree.
    ///
    /// Returns the number of nodes removed.
    ///
    /// # Errors
    ///
    /// Returns `RootImmutable` for the root and `NotFound` if the path is
    /// absent.
    pub fn remove(&mut self, path: &FilePath) -> Result<usize> {
        if path.is_root() {
            return Err(FilesError::RootImmutable);
        }
        if !self.nodes.contains_key(path) {
            return Err(FilesError::NotFound {
                path: path.to_string(),
            });
        }

        let doomed = self.subtree_keys(path);
        for key in &doomed {
            self.nodes.remove(key);
        }
        self.unlink(path);
        Ok(doomed.len())
    }

    /// Moves a node and its subtree to a new path.
    ///
    /// Missing destination parents are created. Directories re-key every
    /// descendant, preserving structure.
    ///
    /// # Errors
    ///
    /// - `RootImmutable` if `from` is the root
    /// - `NotFound` if `from` is absent
    /// - `AlreadyExists` if `to` is occupied
    /// - `InvalidMove` if `to` lies inside `from`
    /// - `NotADirectory` if an ancestor of `to` is a file
    pub fn move_node(&mut self, from: &FilePath, to: &FilePath) -> Result<()> {
        if from.is_root() {
            return Err(FilesError::RootImmutable);
        }
        if !self.nodes.contains_key(from) {
            return Err(FilesError::NotFound {
                path: from.to_string(),
            });
        }
        self.check_vacant(to)?;
        if from.is_ancestor_of(to) {
            return Err(FilesError::InvalidMove {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.check_parents(to)?;

        let keys = self.subtree_keys(from);
        let moved: Vec<Node> = keys
            .iter()
            .filter_map(|key| self.nodes.remove(key))
            .collect();
        self.unlink(from);
        self.ensure_parents(to)?;

        for node in moved {
            let node = node.relocate(from, to);
            self.nodes.insert(node.path().clone(), node);
        }
        if let Some(parent) = to.parent().and_then(|p| self.nodes.get_mut(&p)) {
            parent.attach(to.clone());
        }
        Ok(())
    }

    /// Drops everything except the root.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn check_vacant(&self, path: &FilePath) -> Result<()> {
        if self.nodes.contains_key(path) {
            return Err(FilesError::AlreadyExists {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    fn check_parents(&self, path: &FilePath) -> Result<()> {
        for ancestor in path.ancestors() {
            if let Some(node) = self.nodes.get(&ancestor) {
                if !node.is_directory() {
                    return Err(FilesError::NotADirectory {
                        path: ancestor.to_string(),
                    });
                }
                // Everything above an existing directory exists too.
                break;
            }
        }
        Ok(())
    }

    fn ensure_parents(&mut self, path: &FilePath) -> Result<()> {
        self.check_parents(path)?;
        let mut missing: Vec<FilePath> = path
            .ancestors()
            .into_iter()
            .take_while(|ancestor| !self.nodes.contains_key(ancestor))
            .collect();
        missing.reverse();
        for dir in missing {
            self.link(Node::directory(dir));
        }
        Ok(())
    }

    fn link(&mut self, node: Node) {
        let path = node.path().clone();
        self.nodes.insert(path.clone(), node);
        if let Some(parent) = path.parent().and_then(|p| self.nodes.get_mut(&p)) {
            parent.attach(path);
        }
    }

    fn unlink(&mut self, path: &FilePath) {
        if let Some(parent) = path.parent().and_then(|p| self.nodes.get_mut(&p)) {
            parent.detach(path);
        }
    }

    fn subtree_keys(&self, root: &FilePath) -> Vec<FilePath> {
        let mut keys = vec![root.clone()];
        let prefix = format!("{root}/");
        keys.extend(
            self.nodes
                .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
                .take_while(|(key, _)| key.as_str().starts_with(&prefix))
                .map(|(key, _)| key.clone()),
        );
        keys
    }
}

/// Restartable iterator over `(path, content)` of files, in path order.
///
/// Cloning the iterator restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Files<'a> {
    inner: btree_map::Range<'a, FilePath, Node>,
    prefix: Option<String>,
}

impl<'a> Iterator for Files<'a> {
    type Item = (&'a FilePath, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (path, node) in self.inner.by_ref() {
            if let Some(prefix) = &self.prefix
                && !path.as_str().starts_with(prefix.as_str())
            {
                return None;
            }
            if node.is_file() {
                return Some((path, node.content()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn path(raw: &str) -> FilePath {
        FilePath::new(raw).unwrap()
    }

    fn tree_with(files: &[&str]) -> PathTree {
        let mut tree = PathTree::new();
        for file in files {
            tree.insert_file(&path(file), format!("// {file}")).unwrap();
        }
        tree
    }

    #[test]
    fn test_new_has_root_only() {
        let tree = PathTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.get("/").unwrap().is_directory());
    }

    #[test]
    fn test_insert_creates_parents() {
        let tree = tree_with(&["/a/b/c.jsx"]);
        assert!(tree.get("/a").unwrap().is_directory());
        assert!(tree.get("/a/b").unwrap().is_directory());
        let root_children: Vec<_> = tree.get("/").unwrap().children().collect();
        assert_eq!(root_children, vec![&path("/a")]);
    }

    #[test]
    fn test_insert_twice_fails() {
        let mut tree = tree_with(&["/App.jsx"]);
        let err = tree
            .insert_file(&path("/App.jsx"), "new".to_string())
            .unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(tree.get("/App.jsx").unwrap().content(), "// /App.jsx");
    }

    #[test]
    fn test_insert_under_file_fails() {
        let mut tree = tree_with(&["/a.jsx"]);
        let err = tree
            .insert_file(&path("/a.jsx/b.jsx"), String::new())
            .unwrap_err();
        assert!(err.is_not_directory());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_ensure_directory_idempotent() {
        let mut tree = PathTree::new();
        assert!(tree.ensure_directory(&path("/x/y")).unwrap());
        assert!(!tree.ensure_directory(&path("/x/y")).unwrap());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_set_content_on_directory_fails() {
        let mut tree = tree_with(&["/a/b.jsx"]);
        let err = tree.set_content(&path("/a"), "x".to_string()).unwrap_err();
        assert!(err.is_not_file());
        let err = tree
            .set_content(&path("/missing"), "x".to_string())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = tree_with(&["/a/x.jsx", "/a/b/y.jsx", "/ab.jsx"]);
        let removed = tree.remove(&path("/a")).unwrap();
        assert_eq!(removed, 4);
        assert!(tree.contains("/ab.jsx"));
        assert!(!tree.contains("/a/b"));
        let root_children: Vec<_> = tree.get("/").unwrap().children().collect();
        assert_eq!(root_children, vec![&path("/ab.jsx")]);
    }

    #[test]
    fn test_remove_root_fails() {
        let mut tree = tree_with(&["/a.jsx"]);
        assert!(tree.remove(&FilePath::root()).unwrap_err().is_root_immutable());
    }

    #[test]
    fn test_move_directory_rekeys_descendants() {
        let mut tree = tree_with(&["/a/child/x.jsx", "/a/y.jsx"]);
        tree.move_node(&path("/a"), &path("/b")).unwrap();

        assert!(!tree.contains("/a"));
        assert!(!tree.contains("/a/child/x.jsx"));
        assert_eq!(
            tree.get("/b/child/x.jsx").unwrap().content(),
            "// /a/child/x.jsx"
        );
        let children: Vec<_> = tree.get("/b").unwrap().children().map(FilePath::as_str).collect();
        assert_eq!(children, vec!["/b/child", "/b/y.jsx"]);
    }

    #[test]
    fn test_move_creates_destination_parents() {
        let mut tree = tree_with(&["/App.jsx"]);
        tree.move_node(&path("/App.jsx"), &path("/src/pages/App.jsx"))
            .unwrap();
        assert!(tree.get("/src/pages").unwrap().is_directory());
        assert!(tree.contains("/src/pages/App.jsx"));
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let mut tree = tree_with(&["/a/x.jsx"]);
        let before = tree.clone();
        let err = tree.move_node(&path("/a"), &path("/a/inner")).unwrap_err();
        assert!(err.is_invalid_move());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_failures_leave_tree_untouched() {
        let mut tree = tree_with(&["/a.jsx", "/b.jsx", "/file.txt"]);
        let before = tree.clone();

        assert!(tree.move_node(&path("/a.jsx"), &path("/b.jsx")).unwrap_err().is_already_exists());
        assert!(tree.move_node(&path("/nope"), &path("/c")).unwrap_err().is_not_found());
        assert!(tree
            .move_node(&path("/a.jsx"), &path("/file.txt/a.jsx"))
            .unwrap_err()
            .is_not_directory());
        assert!(tree.move_node(&FilePath::root(), &path("/x")).unwrap_err().is_root_immutable());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_list_entries() {
        let tree = tree_with(&["/components/Button.jsx", "/App.jsx"]);
        let entries = tree.list(&FilePath::root()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            names,
            vec![("App.jsx", NodeKind::File), ("components", NodeKind::Directory)]
        );
        assert!(tree.list(&path("/App.jsx")).unwrap_err().is_not_directory());
        assert!(tree.list(&path("/nope")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_files_iterator_is_restartable() {
        let tree = tree_with(&["/b.jsx", "/a/x.jsx", "/a.jsx"]);
        let files = tree.files();
        let first: Vec<_> = files.clone().map(|(p, _)| p.as_str()).collect();
        let second: Vec<_> = files.map(|(p, _)| p.as_str()).collect();
        assert_eq!(first, vec!["/a.jsx", "/a/x.jsx", "/b.jsx"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_files_under_excludes_siblings() {
        let tree = tree_with(&["/a/x.jsx", "/a/b/y.jsx", "/ab.jsx", "/b.jsx"]);
        let under: Vec<_> = tree
            .files_under(&path("/a"))
            .map(|(p, _)| p.as_str())
            .collect();
        assert_eq!(under, vec!["/a/b/y.jsx", "/a/x.jsx"]);
    }
}
