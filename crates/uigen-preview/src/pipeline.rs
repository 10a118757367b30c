//! One preview build: resolve, transform, materialize, assemble.

use crate::assembler::{DocumentParts, PreviewAssembler};
use crate::error::{Diagnostic, DiagnosticKind, PreviewError, Result};
use crate::import_map::{ImportMap, canonical_key, placeholder_key};
use crate::resolver::{ImportTarget, ModuleGraph, ModuleNode, ModuleResolver, is_relative};
use crate::resource::{DataUrlMaterializer, Materializer, ResourceHandle};
use crate::transform::{Rewrite, SourceTransformer, SpecifierRewrites};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};
use uigen_core::{PreviewConfig, Theme};
use uigen_files::{FilePath, FileSet};

/// Declarations exported by name, used to stub a module that failed to
/// transform.
static EXPORTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bexport\s+(?:const|let|var|class|function\*?|async\s+function\*?)\s*([A-Za-z_$][\w$]*)",
    )
    .unwrap_or_else(|e| unreachable!("invalid export pattern: {e}"))
});

/// `export { a, b as c }`, with or without a `from` clause.
static EXPORT_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s*\{([^}]*)\}")
        .unwrap_or_else(|e| unreachable!("invalid export pattern: {e}"))
});

/// `export const { a, b: c } = ...` and `export const [a, b] = ...`.
static EXPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+(?:const|let|var)\s*(?:\{([^}]*)\}|\[([^\]]*)\])")
        .unwrap_or_else(|e| unreachable!("invalid export pattern: {e}"))
});

/// A built preview document.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewDocument {
    /// Generation the document was built for
    pub generation: u64,
    /// Entry module
    pub entry: FilePath,
    /// The HTML document
    pub html: String,
    /// Unresolved imports and transform failures
    pub diagnostics: Vec<Diagnostic>,
    /// Import map embedded in the document
    pub import_map: ImportMap,
    /// Number of modules in the graph, stylesheets included
    pub module_count: usize,
    /// Resource handles owned by this document
    pub handles: Vec<ResourceHandle>,
}

impl PreviewDocument {
    /// Returns `true` if any file failed to transform.
    #[must_use]
    pub fn has_transform_failures(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::TransformFailure)
    }
}

/// Builds preview documents from file snapshots.
///
/// # Examples
///
/// ```
/// use uigen_core::{PreviewConfig, Theme};
/// use uigen_files::{FilePath, FileSet};
/// use uigen_preview::PreviewPipeline;
///
/// let files: FileSet = [
///     ("/App.jsx", "import Card from './Card';\nexport default () => <Card />;"),
///     ("/Card.jsx", "export default () => <div>card</div>;"),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut pipeline = PreviewPipeline::new(PreviewConfig::default()).unwrap();
/// let entry = FilePath::new("/App.jsx").unwrap();
/// let doc = pipeline.build(&files, &entry, Theme::Light, 1).unwrap();
///
/// assert!(doc.diagnostics.is_empty());
/// assert!(doc.import_map.contains("@/Card.jsx"));
/// assert!(doc.html.contains(r#"import("@/App.jsx")"#));
/// ```
#[derive(Debug)]
pub struct PreviewPipeline {
    transformer: SourceTransformer,
    assembler: PreviewAssembler,
    materializer: Arc<dyn Materializer>,
}

impl PreviewPipeline {
    /// Creates a pipeline that inlines modules as `data:` URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser or templates fail to initialize.
    pub fn new(config: PreviewConfig) -> Result<Self> {
        Self::with_materializer(config, Arc::new(DataUrlMaterializer))
    }

    /// Creates a pipeline with a custom materializer.
    ///
    /// # Errors
    ///
    /// Returns an error if the parser or templates fail to initialize.
    pub fn with_materializer(
        config: PreviewConfig,
        materializer: Arc<dyn Materializer>,
    ) -> Result<Self> {
        Ok(Self {
            transformer: SourceTransformer::new()?,
            assembler: PreviewAssembler::new(config)?,
            materializer,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PreviewConfig {
        self.assembler.config()
    }

    /// Returns the document assembler.
    #[must_use]
    pub const fn assembler(&self) -> &PreviewAssembler {
        &self.assembler
    }

    /// Returns the materializer holding this pipeline's handles.
    #[must_use]
    pub const fn materializer(&self) -> &Arc<dyn Materializer> {
        &self.materializer
    }

    /// Builds a document for `entry`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the document cannot be rendered. Project
    /// problems are reported as diagnostics, not errors.
    pub fn build(
        &mut self,
        files: &FileSet,
        entry: &FilePath,
        theme: Theme,
        generation: u64,
    ) -> Result<PreviewDocument> {
        self.build_while(files, entry, theme, generation, || true)
    }

    /// Builds a document, checking `keep_going` before each module.
    ///
    /// When `keep_going` reports `false` the build stops, releases the
    /// handles it created, and returns `Superseded`.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` when cancelled and `TemplateError` if the
    /// document cannot be rendered.
    pub fn build_while(
        &mut self,
        files: &FileSet,
        entry: &FilePath,
        theme: Theme,
        generation: u64,
        mut keep_going: impl FnMut() -> bool,
    ) -> Result<PreviewDocument> {
        let config = self.assembler.config().clone();
        let resolver = ModuleResolver::new(files, &config);
        let Some(graph) = resolver.walk_while(entry, &mut keep_going) else {
            return Err(PreviewError::Superseded { generation });
        };

        let result = self.assemble(files, &graph, &config, theme, generation, &mut keep_going);
        if result.is_err() {
            let released = self.materializer.release_generation(generation);
            debug!(generation, released, "build abandoned");
        }
        result
    }

    fn assemble(
        &mut self,
        files: &FileSet,
        graph: &ModuleGraph,
        config: &PreviewConfig,
        theme: Theme,
        generation: u64,
        keep_going: &mut impl FnMut() -> bool,
    ) -> Result<PreviewDocument> {
        let mut diagnostics = graph.errors.clone();
        let mut import_map = ImportMap::new();
        let mut handles = Vec::new();
        let mut urls: BTreeMap<&FilePath, String> = BTreeMap::new();
        let mut placeholders: BTreeMap<String, (String, BTreeSet<String>)> = BTreeMap::new();

        for node in graph.scripts() {
            if !keep_going() {
                return Err(PreviewError::Superseded { generation });
            }

            let source = files.get(node.path.as_str()).unwrap_or_default();
            let rewrites = rewrites_for(node, config, &mut placeholders);

            let code = match self.transformer.transform(node.path.as_str(), source, &rewrites) {
                Ok(output) => {
                    for missing in &node.missing {
                        if let Some(names) = output.named_imports.get(&missing.specifier)
                            && let Some((_, wanted)) =
                                placeholders.get_mut(&placeholder_key(&missing.key, config))
                        {
                            wanted.extend(names.iter().filter(|n| is_identifier(n)).cloned());
                        }
                    }
                    output.code
                }
                Err(error) => {
                    warn!(file = %node.path, error = %error, "transform failed");
                    diagnostics.push(Diagnostic::transform_failure(
                        node.path.as_str(),
                        error.message.clone(),
                    ));
                    let exports = exported_names(source);
                    self.assembler.failed_module(
                        &format!("{}: {}", node.path, error.message),
                        &exports,
                    )?
                }
            };

            let handle = self.materializer.materialize(generation, &code);
            import_map.insert(canonical_key(&node.path, config), handle.url.clone());
            import_map.insert_if_absent(node.path.as_str(), handle.url.clone());
            import_map.insert_if_absent(node.path.without_extension(), handle.url.clone());
            urls.insert(&node.path, handle.url.clone());
            handles.push(handle);
        }

        // Specifiers written by importers that are not relative resolve
        // directly through the map as well.
        for node in graph.scripts() {
            for edge in &node.imports {
                if let ImportTarget::Local(target) = &edge.target
                    && !is_relative(&edge.specifier)
                    && let Some(url) = urls.get(target)
                {
                    import_map.insert_if_absent(edge.specifier.as_str(), url.clone());
                }
            }
        }

        for (key, (missing, names)) in placeholders {
            let names: Vec<String> = names.into_iter().collect();
            let code = self.assembler.placeholder_module(&missing, &names)?;
            let handle = self.materializer.materialize(generation, &code);
            import_map.insert(key, handle.url.clone());
            handles.push(handle);
        }

        for library in &config.runtime_libraries {
            import_map.insert(library.specifier.as_str(), library.url.as_str());
        }

        let styles = graph
            .stylesheets()
            .filter_map(|path| files.get(path.as_str()))
            .collect::<Vec<_>>()
            .join("\n");

        let entry_key = canonical_key(&graph.entry, config);
        let html = self.assembler.render_document(&DocumentParts {
            import_map: &import_map,
            entry_key: &entry_key,
            styles: &styles,
            diagnostics: &diagnostics,
            theme,
        })?;

        info!(
            generation,
            entry = %graph.entry,
            modules = graph.len(),
            diagnostics = diagnostics.len(),
            "preview built"
        );

        Ok(PreviewDocument {
            generation,
            entry: graph.entry.clone(),
            html,
            diagnostics,
            import_map,
            module_count: graph.len(),
            handles,
        })
    }
}

/// Rewrites for one module: local imports go to canonical keys,
/// stylesheets are dropped, and unresolved imports go to placeholders.
fn rewrites_for(
    node: &ModuleNode,
    config: &PreviewConfig,
    placeholders: &mut BTreeMap<String, (String, BTreeSet<String>)>,
) -> SpecifierRewrites {
    let mut rewrites = SpecifierRewrites::new();
    for edge in &node.imports {
        if let ImportTarget::Local(target) = &edge.target {
            let rewrite = if config.is_stylesheet_path(target.as_str()) {
                Rewrite::Drop
            } else {
                Rewrite::To(canonical_key(target, config))
            };
            rewrites.insert(edge.specifier.clone(), rewrite);
        }
    }
    for missing in &node.missing {
        if config.is_stylesheet_path(&missing.key) {
            rewrites.insert(missing.specifier.clone(), Rewrite::Drop);
            continue;
        }
        let key = placeholder_key(&missing.key, config);
        placeholders
            .entry(key.clone())
            .or_insert_with(|| (missing.specifier.clone(), BTreeSet::new()));
        rewrites.insert(missing.specifier.clone(), Rewrite::To(key));
    }
    debug!(module = %node.path, rewrites = rewrites.len(), "specifier rewrites");
    rewrites
}

/// Names a module exports, in source order.
///
/// Reads declarations, export lists and destructuring patterns with
/// regexes, since the module did not parse.
fn exported_names(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for caps in EXPORTED_NAME.captures_iter(source) {
        if let Some(m) = caps.get(1) {
            found.push((m.start(), m.as_str().to_string()));
        }
    }
    for caps in EXPORT_LIST.captures_iter(source) {
        if let Some(m) = caps.get(1) {
            found.extend(
                m.as_str()
                    .split(',')
                    .filter_map(list_entry_name)
                    .map(|name| (m.start(), name.to_string())),
            );
        }
    }
    for caps in EXPORT_PATTERN.captures_iter(source) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            found.extend(
                m.as_str()
                    .split(',')
                    .filter_map(pattern_entry_name)
                    .map(|name| (m.start(), name.to_string())),
            );
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    let mut seen = BTreeSet::new();
    found
        .into_iter()
        .map(|(_, name)| name)
        .filter(|name| is_identifier(name) && seen.insert(name.clone()))
        .collect()
}

/// `a` or `a as b`; type-only entries export nothing at runtime.
fn list_entry_name(entry: &str) -> Option<&str> {
    let mut words = entry.split_whitespace();
    let first = words.next()?;
    match (first, words.next(), words.next()) {
        ("type", Some(_), _) => None,
        (_, Some("as"), Some(alias)) => Some(alias),
        _ => Some(first),
    }
}

/// `a`, `a = 1`, `key: a` or `...rest`.
fn pattern_entry_name(entry: &str) -> Option<&str> {
    let entry = entry.trim().trim_start_matches("...");
    let binding = entry.split_once(':').map_or(entry, |(_, binding)| binding);
    binding.split('=').next().map(str::trim)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    name != "default"
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
