//! Configuration for the preview compilation pipeline.
//!
//! Every field has a default matching the conventions the generation prompt
//! teaches the agent (`/App.jsx` entry, `@/` alias, React from a CDN), so an
//! empty TOML file is a valid configuration.
//!
//! # Examples
//!
//! ```
//! use uigen_core::PreviewConfig;
//!
//! // Use default configuration
//! let config = PreviewConfig::default();
//! assert_eq!(config.alias_prefix, "@/");
//! assert!(config.runtime_url("react").is_some());
//!
//! // Override a single field from TOML
//! let custom = PreviewConfig::from_toml_str(r#"alias_prefix = "~/""#).unwrap();
//! assert_eq!(custom.alias_prefix, "~/");
//! assert_eq!(custom.entry_candidates, PreviewConfig::default().entry_candidates);
//! ```

use crate::{Error, Result, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const REACT_VERSION: &str = "19.1.0";

/// A pre-resolved runtime library reachable through a bare specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeLibrary {
    /// Bare import specifier, e.g. `react-dom/client`
    pub specifier: String,
    /// Browser-loadable module URL
    pub url: String,
}

impl RuntimeLibrary {
    /// Creates a runtime library mapping.
    #[must_use]
    pub fn new(specifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            url: url.into(),
        }
    }
}

/// Preview pipeline configuration.
///
/// Controls entry discovery, specifier resolution and the shape of the
/// generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Import prefix that maps to the project root.
    ///
    /// Default: `@/`
    pub alias_prefix: String,

    /// Conventional entry paths, probed in order.
    ///
    /// Default: `/App.jsx`, `/App.tsx`, `/index.jsx`, `/index.tsx`,
    /// `/src/App.jsx`, `/src/App.tsx`
    pub entry_candidates: Vec<String>,

    /// Extensions appended to extension-less specifiers, probed in order.
    ///
    /// Default: `.jsx`, `.tsx`, `.js`, `.ts`
    pub probe_extensions: Vec<String>,

    /// Extensions that mark a file as component syntax.
    ///
    /// Used by the entry-discovery fallback. Default: `.jsx`, `.tsx`
    pub component_extensions: Vec<String>,

    /// Extensions aggregated into the style block instead of the import map.
    ///
    /// Default: `.css`
    pub stylesheet_extensions: Vec<String>,

    /// Fixed table of bare specifiers the preview can load.
    pub runtime_libraries: Vec<RuntimeLibrary>,

    /// Tailwind CDN script injected into the document head.
    ///
    /// `None` disables the script. Default: the Tailwind play CDN
    pub tailwind_cdn: Option<String>,

    /// Theme used when the host does not supply one.
    pub theme: Theme,

    /// Document title.
    pub title: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            alias_prefix: "@/".to_string(),
            entry_candidates: [
                "/App.jsx",
                "/App.tsx",
                "/index.jsx",
                "/index.tsx",
                "/src/App.jsx",
                "/src/App.tsx",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            probe_extensions: [".jsx", ".tsx", ".js", ".ts"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            component_extensions: vec![".jsx".to_string(), ".tsx".to_string()],
            stylesheet_extensions: vec![".css".to_string()],
            runtime_libraries: vec![
                RuntimeLibrary::new("react", format!("https://esm.sh/react@{REACT_VERSION}")),
                RuntimeLibrary::new(
                    "react/jsx-runtime",
                    format!("https://esm.sh/react@{REACT_VERSION}/jsx-runtime"),
                ),
                RuntimeLibrary::new(
                    "react-dom",
                    format!("https://esm.sh/react-dom@{REACT_VERSION}?deps=react@{REACT_VERSION}"),
                ),
                RuntimeLibrary::new(
                    "react-dom/client",
                    format!(
                        "https://esm.sh/react-dom@{REACT_VERSION}/client?deps=react@{REACT_VERSION}"
                    ),
                ),
            ],
            tailwind_cdn: Some("https://cdn.tailwindcss.com".to_string()),
            theme: Theme::Light,
            title: "Preview".to_string(),
        }
    }
}

impl PreviewConfig {
    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the TOML is malformed, contains unknown
    /// keys, or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("invalid preview configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigError` if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded preview configuration");
        Self::from_toml_str(&text)
    }

    /// Loads the user configuration file if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file exists but is unreadable or invalid.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Default configuration location: `<config dir>/uigen/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("uigen").join("config.toml"))
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.alias_prefix.is_empty() || !self.alias_prefix.ends_with('/') {
            return Err(Error::ConfigError {
                message: format!(
                    "alias_prefix must be non-empty and end with '/': '{}'",
                    self.alias_prefix
                ),
            });
        }

        if self.alias_prefix.starts_with('.') || self.alias_prefix == "/" {
            return Err(Error::ConfigError {
                message: "alias_prefix must not shadow relative or absolute specifiers"
                    .to_string(),
            });
        }

        if let Some(bad) = self
            .entry_candidates
            .iter()
            .find(|candidate| !candidate.starts_with('/'))
        {
            return Err(Error::ConfigError {
                message: format!("entry candidate must be an absolute path: '{bad}'"),
            });
        }

        if let Some(bad) = self
            .probe_extensions
            .iter()
            .chain(&self.component_extensions)
            .chain(&self.stylesheet_extensions)
            .find(|ext| !ext.starts_with('.'))
        {
            return Err(Error::ConfigError {
                message: format!("extensions must start with '.': '{bad}'"),
            });
        }

        if let Some(lib) = self
            .runtime_libraries
            .iter()
            .find(|lib| lib.specifier.starts_with('.') || lib.specifier.starts_with('/'))
        {
            return Err(Error::ConfigError {
                message: format!(
                    "runtime library specifier must be bare: '{}'",
                    lib.specifier
                ),
            });
        }

        Ok(())
    }

    /// Returns the URL of a pre-resolved runtime library.
    #[must_use]
    pub fn runtime_url(&self, specifier: &str) -> Option<&str> {
        self.runtime_libraries
            .iter()
            .find(|lib| lib.specifier == specifier)
            .map(|lib| lib.url.as_str())
    }

    /// Returns `true` if the path carries a component-syntax extension.
    #[must_use]
    pub fn is_component_path(&self, path: &str) -> bool {
        self.component_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }

    /// Returns `true` if the path is a stylesheet.
    #[must_use]
    pub fn is_stylesheet_path(&self, path: &str) -> bool {
        self.stylesheet_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }
}
