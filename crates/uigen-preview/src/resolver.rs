//! Module graph resolution.
//!
//! Walks the project breadth-first from the entry module, resolving each
//! import specifier found by [`import_specifiers`] against the file
//! snapshot. Specifiers that resolve to nothing become [`Diagnostic`]s on
//! the graph; the walk always produces a (possibly partial) graph.
//!
//! # Resolution order
//!
//! 1. Runtime libraries (`react`, `react-dom/client`, ...) by exact name
//! 2. The alias prefix (`@/`) maps onto the project root
//! 3. Relative specifiers resolve against the importer's directory;
//!    absolute ones are taken as-is
//! 4. The exact path, then each probe extension, then `index` files

use crate::error::Diagnostic;
use crate::transform::import_specifiers;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, warn};
use uigen_core::PreviewConfig;
use uigen_files::{FilePath, FileSet};

/// What a module is, as far as the preview cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Script or component source
    Script,
    /// Stylesheet, aggregated rather than imported
    Stylesheet,
}

/// Where an import specifier points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum ImportTarget {
    /// A file in the project
    Local(FilePath),
    /// A pre-resolved runtime library URL
    Runtime(String),
}

/// One resolved import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportEdge {
    /// Specifier as written by the importer
    pub specifier: String,
    /// Resolved target
    pub target: ImportTarget,
}

/// An import that resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MissingImport {
    /// Specifier as written by the importer
    pub specifier: String,
    /// Normalized path the specifier would have named, or the bare name
    pub key: String,
}

/// A module reachable from the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNode {
    /// Module path
    pub path: FilePath,
    /// Script or stylesheet
    pub kind: ModuleKind,
    /// Resolved imports in source order
    pub imports: Vec<ImportEdge>,
    /// Imports that did not resolve
    pub missing: Vec<MissingImport>,
}

impl ModuleNode {
    /// Looks up the edge for a specifier.
    #[must_use]
    pub fn edge(&self, specifier: &str) -> Option<&ImportEdge> {
        self.imports.iter().find(|edge| edge.specifier == specifier)
    }
}

/// The transitive module graph of one preview build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleGraph {
    /// Entry module
    pub entry: FilePath,
    /// Modules in discovery order; the entry comes first
    pub modules: IndexMap<FilePath, ModuleNode>,
    /// Unresolved imports
    pub errors: Vec<Diagnostic>,
}

impl ModuleGraph {
    /// Looks up a module.
    #[must_use]
    pub fn module(&self, path: &str) -> Option<&ModuleNode> {
        self.modules.get(path)
    }

    /// Stylesheets in discovery order.
    pub fn stylesheets(&self) -> impl Iterator<Item = &FilePath> {
        self.modules
            .values()
            .filter(|module| module.kind == ModuleKind::Stylesheet)
            .map(|module| &module.path)
    }

    /// Script modules in discovery order.
    pub fn scripts(&self) -> impl Iterator<Item = &ModuleNode> {
        self.modules
            .values()
            .filter(|module| module.kind == ModuleKind::Script)
    }

    /// Number of modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the graph holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Resolves import specifiers against a file snapshot.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::{FilePath, FileSet};
/// use uigen_preview::resolver::{ImportTarget, ModuleResolver};
///
/// let files: FileSet = [
///     ("/App.jsx", "import Card from '@/components/Card';"),
///     ("/components/Card.jsx", "export default () => null;"),
/// ]
/// .into_iter()
/// .collect();
/// let config = PreviewConfig::default();
/// let resolver = ModuleResolver::new(&files, &config);
///
/// let app = FilePath::new("/App.jsx").unwrap();
/// assert_eq!(
///     resolver.resolve(&app, "@/components/Card"),
///     Some(ImportTarget::Local(FilePath::new("/components/Card.jsx").unwrap()))
/// );
///
/// let graph = resolver.walk(&app);
/// assert_eq!(graph.len(), 2);
/// assert!(graph.errors.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    files: &'a FileSet,
    config: &'a PreviewConfig,
}

impl<'a> ModuleResolver<'a> {
    /// Creates a resolver over a snapshot.
    #[must_use]
    pub const fn new(files: &'a FileSet, config: &'a PreviewConfig) -> Self {
        Self { files, config }
    }

    /// Resolves `specifier` as imported from `importer`.
    #[must_use]
    pub fn resolve(&self, importer: &FilePath, specifier: &str) -> Option<ImportTarget> {
        if let Some(url) = self.config.runtime_url(specifier) {
            return Some(ImportTarget::Runtime(url.to_string()));
        }
        let base = self.base_path(importer, specifier)?;
        self.probe(&base).map(ImportTarget::Local)
    }

    /// The path a local specifier names before probing, or `None` for bare
    /// package names.
    #[must_use]
    pub fn base_path(&self, importer: &FilePath, specifier: &str) -> Option<FilePath> {
        if let Some(rest) = specifier.strip_prefix(self.config.alias_prefix.as_str()) {
            return FilePath::new(format!("/{rest}")).ok();
        }
        if is_relative(specifier) {
            let dir = importer.parent().unwrap_or_else(FilePath::root);
            return dir.join(specifier).ok();
        }
        if specifier.starts_with('/') {
            return FilePath::new(specifier).ok();
        }
        None
    }

    fn probe(&self, base: &FilePath) -> Option<FilePath> {
        if self.files.contains(base.as_str()) {
            return Some(base.clone());
        }
        let exts = &self.config.probe_extensions;
        exts.iter()
            .map(|ext| format!("{base}{ext}"))
            .chain(exts.iter().map(|ext| {
                if base.is_root() {
                    format!("/index{ext}")
                } else {
                    format!("{base}/index{ext}")
                }
            }))
            .find(|candidate| self.files.contains(candidate))
            .and_then(|candidate| FilePath::new(candidate).ok())
    }

    /// Builds the module graph reachable from `entry`.
    #[must_use]
    pub fn walk(&self, entry: &FilePath) -> ModuleGraph {
        self.walk_while(entry, || true)
            .unwrap_or_else(|| unreachable!("walk without cancellation always completes"))
    }

    /// Builds the module graph, checking `keep_going` before each module.
    ///
    /// Returns `None` as soon as `keep_going` reports `false`.
    pub fn walk_while(
        &self,
        entry: &FilePath,
        mut keep_going: impl FnMut() -> bool,
    ) -> Option<ModuleGraph> {
        let mut modules: IndexMap<FilePath, ModuleNode> = IndexMap::new();
        let mut errors = Vec::new();
        let mut queue = VecDeque::from([entry.clone()]);

        while let Some(path) = queue.pop_front() {
            if !keep_going() {
                debug!(entry = %entry, visited = modules.len(), "module walk cancelled");
                return None;
            }
            if modules.contains_key(&path) {
                continue;
            }

            let Some(source) = self.files.get(path.as_str()) else {
                continue;
            };

            if self.config.is_stylesheet_path(path.as_str()) {
                modules.insert(
                    path.clone(),
                    ModuleNode {
                        path,
                        kind: ModuleKind::Stylesheet,
                        imports: Vec::new(),
                        missing: Vec::new(),
                    },
                );
                continue;
            }

            let mut node = ModuleNode {
                path: path.clone(),
                kind: ModuleKind::Script,
                imports: Vec::new(),
                missing: Vec::new(),
            };

            let specifiers = match import_specifiers(path.as_str(), source) {
                Ok(specifiers) => specifiers,
                Err(error) => {
                    warn!(module = %path, error = %error, "cannot scan imports");
                    errors.push(Diagnostic::transform_failure(path.as_str(), error.message));
                    Vec::new()
                }
            };

            for specifier in specifiers {
                match self.resolve(&path, &specifier) {
                    Some(target) => {
                        if let ImportTarget::Local(dep) = &target
                            && !modules.contains_key(dep)
                        {
                            queue.push_back(dep.clone());
                        }
                        node.imports.push(ImportEdge { specifier, target });
                    }
                    None => {
                        warn!(importer = %path, specifier = %specifier, "unresolved import");
                        errors.push(Diagnostic::unresolved_import(path.as_str(), &specifier));
                        let key = self
                            .base_path(&path, &specifier)
                            .map_or_else(|| specifier.clone(), |base| base.to_string());
                        node.missing.push(MissingImport { specifier, key });
                    }
                }
            }

            modules.insert(path, node);
        }

        debug!(entry = %entry, modules = modules.len(), errors = errors.len(), "module graph built");
        Some(ModuleGraph {
            entry: entry.clone(),
            modules,
            errors,
        })
    }
}

/// Returns `true` for `./x`, `../x`, `.` and `..`.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}
