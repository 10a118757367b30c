//! Preview document assembly.
//!
//! Turns the pieces produced by a build (import map, entry key, styles,
//! diagnostics) into one self-contained HTML document, and renders the
//! status pages shown when there is nothing to build.

use crate::error::{Diagnostic, Result};
use crate::import_map::ImportMap;
use crate::template_engine::TemplateEngine;
use crate::transform::js_string;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use uigen_core::{PreviewConfig, Theme};

/// Sandbox policy for the frame hosting a preview document.
///
/// Scripts and same-origin loading are allowed; top-level navigation is
/// not.
pub const SANDBOX_POLICY: &str = "allow-scripts allow-same-origin allow-forms";

/// What the preview shows.
///
/// `Welcome` and `NoFiles` are the empty states, `NoComponent` is the
/// unresolved-entry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewState {
    /// No files, and the project never had any
    Welcome,
    /// No files after having had some
    NoFiles,
    /// Files exist but none can be the entry
    NoComponent,
    /// A document was built
    Ready,
}

impl PreviewState {
    /// Returns the snake-case name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::NoFiles => "no_files",
            Self::NoComponent => "no_component",
            Self::Ready => "ready",
        }
    }

    /// Returns `true` for the two empty-project states.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Welcome | Self::NoFiles)
    }

    const fn texts(self) -> (&'static str, &'static str, Option<&'static str>) {
        match self {
            Self::Welcome => (
                "Welcome to UI Generator",
                "Start building React components with AI assistance",
                Some("Ask the AI to create your first component to see it live here"),
            ),
            Self::NoFiles => ("No Preview Available", "No files to preview", None),
            Self::NoComponent => (
                "No Preview Available",
                "No React component found. Create an App.jsx or index.jsx file to get started.",
                None,
            ),
            Self::Ready => ("Preview", "", None),
        }
    }
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one preview document.
#[derive(Debug, Clone)]
pub struct DocumentParts<'a> {
    /// Resolved import map
    pub import_map: &'a ImportMap,
    /// Import-map key of the entry module
    pub entry_key: &'a str,
    /// Aggregated stylesheet text
    pub styles: &'a str,
    /// Diagnostics rendered into the static overlay
    pub diagnostics: &'a [Diagnostic],
    /// Theme applied to the document and root element
    pub theme: Theme,
}

#[derive(Serialize)]
struct DiagnosticView {
    kind: &'static str,
    text: String,
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    title: &'a str,
    theme_class: &'static str,
    tailwind_cdn: Option<&'a str>,
    import_map: String,
    styles: String,
    diagnostics: Vec<DiagnosticView>,
    diagnostic_count: usize,
    entry: String,
}

#[derive(Serialize)]
struct StatusContext<'a> {
    title: &'a str,
    theme_class: &'static str,
    state: &'static str,
    heading: &'static str,
    message: &'static str,
    hint: Option<&'static str>,
}

#[derive(Serialize)]
struct PlaceholderContext<'a> {
    specifier: String,
    names: &'a [String],
}

#[derive(Serialize)]
struct FailedModuleContext<'a> {
    message: String,
    exports: &'a [String],
}

/// Renders preview documents and stub modules.
///
/// # Examples
///
/// ```
/// use uigen_core::{PreviewConfig, Theme};
/// use uigen_preview::{PreviewAssembler, PreviewState};
///
/// let assembler = PreviewAssembler::new(PreviewConfig::default()).unwrap();
/// let html = assembler.render_status(PreviewState::Welcome, Theme::Dark).unwrap();
///
/// assert!(html.contains("Welcome to UI Generator"));
/// assert!(html.contains(r#"<html lang="en" class="dark">"#));
/// ```
#[derive(Debug)]
pub struct PreviewAssembler {
    templates: TemplateEngine<'static>,
    config: PreviewConfig,
}

impl PreviewAssembler {
    /// Creates an assembler.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the built-in templates fail to register.
    pub fn new(config: PreviewConfig) -> Result<Self> {
        Ok(Self {
            templates: TemplateEngine::new()?,
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Renders the full preview document.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if rendering fails.
    pub fn render_document(&self, parts: &DocumentParts<'_>) -> Result<String> {
        let diagnostics: Vec<DiagnosticView> = parts
            .diagnostics
            .iter()
            .map(|diagnostic| DiagnosticView {
                kind: diagnostic.kind.as_str(),
                text: diagnostic.to_string(),
            })
            .collect();

        let context = DocumentContext {
            title: &self.config.title,
            theme_class: parts.theme.root_class(),
            tailwind_cdn: self.config.tailwind_cdn.as_deref(),
            import_map: parts.import_map.to_json(),
            styles: escape_style(parts.styles),
            diagnostic_count: diagnostics.len(),
            diagnostics,
            entry: script_string(parts.entry_key),
        };
        self.templates.render("document", &context)
    }

    /// Renders the page shown for a state without a document.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if rendering fails.
    pub fn render_status(&self, state: PreviewState, theme: Theme) -> Result<String> {
        let (heading, message, hint) = state.texts();
        let context = StatusContext {
            title: &self.config.title,
            theme_class: theme.root_class(),
            state: state.as_str(),
            heading,
            message,
            hint,
        };
        self.templates.render("status", &context)
    }

    /// Module standing in for an import that did not resolve.
    ///
    /// Exports a component rendering nothing as the default export and
    /// under each of `names`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if rendering fails.
    pub fn placeholder_module(&self, specifier: &str, names: &[String]) -> Result<String> {
        let context = PlaceholderContext {
            specifier: script_string(specifier),
            names,
        };
        self.templates.render("placeholder", &context)
    }

    /// Module replacing a file that failed to transform.
    ///
    /// Declares `exports` so importers still link, then throws `message`
    /// when evaluated.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if rendering fails.
    pub fn failed_module(&self, message: &str, exports: &[String]) -> Result<String> {
        let context = FailedModuleContext {
            message: script_string(message),
            exports,
        };
        self.templates.render("failed_module", &context)
    }
}

/// A JavaScript string literal safe inside an inline `<script>`.
fn script_string(value: &str) -> String {
    js_string(value).replace('<', "\\u003c")
}

/// End tags the HTML parser treats as closing `<style>`, in any case.
static STYLE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(style)").unwrap_or_else(|e| unreachable!("invalid style pattern: {e}"))
});

/// Keeps stylesheet text from closing the `<style>` element early.
fn escape_style(styles: &str) -> String {
    STYLE_END.replace_all(styles, r"<\/$1").into_owned()
}
