//! Browser import maps.
//!
//! Every local module is published under a canonical bare key
//! (`@/components/Card.jsx`) so it resolves the same way no matter which
//! URL scheme the importing module was loaded from. Transformed sources
//! import each other through these keys; the absolute path, the
//! extension-less path and every alias specifier an importer wrote are
//! mapped as well.

use serde::Serialize;
use std::collections::BTreeMap;
use uigen_core::PreviewConfig;
use uigen_files::FilePath;

/// Segment under the alias prefix that holds placeholder modules.
const MISSING_SEGMENT: &str = "__missing__";

/// Canonical import-map key of a local module.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::FilePath;
/// use uigen_preview::import_map::canonical_key;
///
/// let path = FilePath::new("/components/Card.jsx").unwrap();
/// assert_eq!(canonical_key(&path, &PreviewConfig::default()), "@/components/Card.jsx");
/// ```
#[must_use]
pub fn canonical_key(path: &FilePath, config: &PreviewConfig) -> String {
    format!(
        "{}{}",
        config.alias_prefix,
        path.as_str().trim_start_matches('/')
    )
}

/// Import-map key of the placeholder standing in for an unresolved import.
///
/// `missing` is the path the specifier would have named, or the bare
/// specifier for package names.
#[must_use]
pub fn placeholder_key(missing: &str, config: &PreviewConfig) -> String {
    format!(
        "{}{MISSING_SEGMENT}/{}",
        config.alias_prefix,
        missing.trim_start_matches('/')
    )
}

/// A specifier to URL mapping, rendered as `{"imports": {...}}`.
///
/// # Examples
///
/// ```
/// use uigen_preview::ImportMap;
///
/// let mut map = ImportMap::new();
/// map.insert("react", "https://esm.sh/react@19.1.0");
/// map.insert("@/App.jsx", "data:text/javascript,export%20default%201");
///
/// assert_eq!(map.get("react"), Some("https://esm.sh/react@19.1.0"));
/// assert!(map.to_json().starts_with(r#"{"imports":{"#));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMap {
    imports: BTreeMap<String, String>,
}

impl ImportMap {
    /// Creates an empty import map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `specifier` to `url`, replacing any earlier mapping.
    pub fn insert(&mut self, specifier: impl Into<String>, url: impl Into<String>) {
        self.imports.insert(specifier.into(), url.into());
    }

    /// Maps `specifier` to `url` unless it is already mapped.
    ///
    /// Returns `true` if the mapping was added.
    pub fn insert_if_absent(&mut self, specifier: impl Into<String>, url: impl Into<String>) -> bool {
        let specifier = specifier.into();
        if self.imports.contains_key(&specifier) {
            return false;
        }
        self.imports.insert(specifier, url.into());
        true
    }

    /// Looks up a specifier.
    #[must_use]
    pub fn get(&self, specifier: &str) -> Option<&str> {
        self.imports.get(specifier).map(String::as_str)
    }

    /// Returns `true` if `specifier` is mapped.
    #[must_use]
    pub fn contains(&self, specifier: &str) -> bool {
        self.imports.contains_key(specifier)
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.imports.len()
    }

    /// Returns `true` if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Mappings in specifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON safe to embed in a `<script type="importmap">` element.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| String::from(r#"{"imports":{}}"#))
            .replace('<', "\\u003c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key() {
        let config = PreviewConfig::default();
        assert_eq!(
            placeholder_key("/components/X", &config),
            "@/__missing__/components/X"
        );
        assert_eq!(placeholder_key("lodash", &config), "@/__missing__/lodash");
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut map = ImportMap::new();
        assert!(map.insert_if_absent("a", "1"));
        assert!(!map.insert_if_absent("a", "2"));
        assert_eq!(map.get("a"), Some("1"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_json_escapes_script_close() {
        let mut map = ImportMap::new();
        map.insert("x", "data:text/javascript,</script>");
        let json = map.to_json();
        assert!(!json.contains("</script>"));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["imports"]["x"], "data:text/javascript,</script>");
    }
}
