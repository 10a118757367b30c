//! Entry-point discovery.

use serde::Serialize;
use uigen_core::PreviewConfig;
use uigen_files::{FilePath, FileSet};

/// Outcome of looking for the module a preview starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum EntryPoint {
    /// The entry module
    Found(FilePath),
    /// Files exist but none is a component
    NoComponent,
    /// The project has no files at all
    EmptyProject,
}

impl EntryPoint {
    /// Returns the entry path if one was found.
    #[must_use]
    pub const fn path(&self) -> Option<&FilePath> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoComponent | Self::EmptyProject => None,
        }
    }
}

/// Picks the entry module for `files`.
///
/// A `previous` entry that still exists wins. Otherwise the configured
/// candidates are probed in order, and failing that the first component
/// file in path order is used.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::FileSet;
/// use uigen_preview::{EntryPoint, discover_entry};
///
/// let files: FileSet = [("/components/Counter.jsx", "export default () => null")]
///     .into_iter()
///     .collect();
///
/// let entry = discover_entry(&files, None, &PreviewConfig::default());
/// assert_eq!(entry.path().map(|p| p.as_str()), Some("/components/Counter.jsx"));
/// ```
#[must_use]
pub fn discover_entry(
    files: &FileSet,
    previous: Option<&FilePath>,
    config: &PreviewConfig,
) -> EntryPoint {
    if files.is_empty() {
        return EntryPoint::EmptyProject;
    }

    if let Some(previous) = previous
        && files.contains(previous.as_str())
    {
        return EntryPoint::Found(previous.clone());
    }

    let candidate = config
        .entry_candidates
        .iter()
        .find(|candidate| files.contains(candidate))
        .and_then(|candidate| FilePath::new(candidate).ok());
    if let Some(path) = candidate {
        return EntryPoint::Found(path);
    }

    files
        .paths()
        .find(|path| config.is_component_path(path.as_str()))
        .map_or(EntryPoint::NoComponent, |path| EntryPoint::Found(path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> FileSet {
        paths.iter().map(|p| (*p, "")).collect()
    }

    fn found(entry: &EntryPoint) -> Option<&str> {
        entry.path().map(FilePath::as_str)
    }

    #[test]
    fn test_empty_project() {
        let entry = discover_entry(&FileSet::new(), None, &PreviewConfig::default());
        assert_eq!(entry, EntryPoint::EmptyProject);
    }

    #[test]
    fn test_candidates_in_order() {
        let config = PreviewConfig::default();
        let entry = discover_entry(&files(&["/index.jsx", "/App.tsx"]), None, &config);
        assert_eq!(found(&entry), Some("/App.tsx"));

        let entry = discover_entry(&files(&["/src/App.jsx", "/lib/util.js"]), None, &config);
        assert_eq!(found(&entry), Some("/src/App.jsx"));
    }

    #[test]
    fn test_falls_back_to_first_component() {
        let entry = discover_entry(
            &files(&["/utils/format.js", "/widgets/Zed.tsx", "/components/Counter.jsx"]),
            None,
            &PreviewConfig::default(),
        );
        assert_eq!(found(&entry), Some("/components/Counter.jsx"));
    }

    #[test]
    fn test_no_component() {
        let entry = discover_entry(&files(&["/readme.md"]), None, &PreviewConfig::default());
        assert_eq!(entry, EntryPoint::NoComponent);
    }

    #[test]
    fn test_previous_entry_is_sticky() {
        let previous = FilePath::new("/components/Card.jsx").unwrap();
        let entry = discover_entry(
            &files(&["/App.jsx", "/components/Card.jsx"]),
            Some(&previous),
            &PreviewConfig::default(),
        );
        assert_eq!(found(&entry), Some("/components/Card.jsx"));
    }

    #[test]
    fn test_previous_entry_dropped_when_deleted() {
        let previous = FilePath::new("/Old.jsx").unwrap();
        let entry = discover_entry(&files(&["/App.jsx"]), Some(&previous), &PreviewConfig::default());
        assert_eq!(found(&entry), Some("/App.jsx"));
    }
}
