//! Error and diagnostic types for the preview pipeline.
//!
//! Two families live here. [`PreviewError`] covers failures of the pipeline
//! machinery itself (a superseded build, a broken template). [`Diagnostic`]
//! covers problems in the user's project (an import that does not resolve,
//! a file that cannot be transformed); those are collected and rendered
//! into the preview instead of aborting it.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised by the preview pipeline machinery.
///
/// # Examples
///
/// ```
/// use uigen_preview::PreviewError;
///
/// let error = PreviewError::Superseded { generation: 3 };
/// assert!(error.is_superseded());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// A newer build started before this one finished
    #[error("Build {generation} was superseded by a newer build")]
    Superseded {
        /// Generation of the abandoned build
        generation: u64,
    },

    /// A finished build is older than the preview already shown
    #[error("Build {generation} is older than the current preview ({current})")]
    StaleResult {
        /// Generation of the rejected build
        generation: u64,
        /// Generation currently committed
        current: u64,
    },

    /// A document template failed to register or render
    #[error("Template error: {message}")]
    TemplateError {
        /// Failure description
        message: String,
    },

    /// The source parser could not be initialized
    #[error("Parser initialization failed: {message}")]
    ParserInit {
        /// Failure description
        message: String,
    },
}

impl PreviewError {
    /// Returns `true` if the build was superseded.
    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Returns `true` if a finished build was older than the current preview.
    #[must_use]
    pub const fn is_stale_result(&self) -> bool {
        matches!(self, Self::StaleResult { .. })
    }

    /// Returns `true` for template failures.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` for parser initialization failures.
    #[must_use]
    pub const fn is_parser_init(&self) -> bool {
        matches!(self, Self::ParserInit { .. })
    }
}

/// Result type alias for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Kind of problem found in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An import specifier matched no file and no runtime library
    UnresolvedImport,
    /// A file could not be lowered to executable script
    TransformFailure,
    /// Files exist but none can serve as the entry point
    NoEntryPoint,
    /// The project has no files
    EmptyProject,
}

impl DiagnosticKind {
    /// Returns the snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvedImport => "unresolved_import",
            Self::TransformFailure => "transform_failure",
            Self::NoEntryPoint => "no_entry_point",
            Self::EmptyProject => "empty_project",
        }
    }
}

/// A non-fatal problem found while building a preview.
///
/// # Examples
///
/// ```
/// use uigen_preview::{Diagnostic, DiagnosticKind};
///
/// let diag = Diagnostic::unresolved_import("/App.jsx", "@/components/X");
/// assert_eq!(diag.kind, DiagnosticKind::UnresolvedImport);
/// assert_eq!(diag.to_string(), "/App.jsx: Cannot resolve import '@/components/X'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// File the problem was found in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Import specifier involved, for unresolved imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifier: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// An import in `importer` that could not be resolved.
    #[must_use]
    pub fn unresolved_import(importer: impl Into<String>, specifier: impl Into<String>) -> Self {
        let specifier = specifier.into();
        Self {
            kind: DiagnosticKind::UnresolvedImport,
            file: Some(importer.into()),
            message: format!("Cannot resolve import '{specifier}'"),
            specifier: Some(specifier),
        }
    }

    /// A file whose source could not be transformed.
    #[must_use]
    pub fn transform_failure(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::TransformFailure,
            file: Some(file.into()),
            specifier: None,
            message: message.into(),
        }
    }

    /// Files exist but no entry point was found.
    #[must_use]
    pub fn no_entry_point() -> Self {
        Self {
            kind: DiagnosticKind::NoEntryPoint,
            file: None,
            specifier: None,
            message: "No React component found. Create an App.jsx or index.jsx file to get started."
                .to_string(),
        }
    }

    /// The project has no files.
    #[must_use]
    pub fn empty_project() -> Self {
        Self {
            kind: DiagnosticKind::EmptyProject,
            file: None,
            specifier: None,
            message: "No files to preview".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classifiers() {
        let stale = PreviewError::StaleResult {
            generation: 1,
            current: 2,
        };
        assert!(stale.is_stale_result());
        assert!(!stale.is_superseded());
        assert_eq!(
            stale.to_string(),
            "Build 1 is older than the current preview (2)"
        );
    }

    #[test]
    fn test_transform_failure_display() {
        let diag = Diagnostic::transform_failure("/App.tsx", "Syntax error at 3:7");
        assert_eq!(diag.to_string(), "/App.tsx: Syntax error at 3:7");
        assert_eq!(diag.kind.as_str(), "transform_failure");
    }

    #[test]
    fn test_diagnostic_serialization_skips_missing_fields() {
        let json = serde_json::to_value(Diagnostic::empty_project()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "empty_project", "message": "No files to preview"})
        );
    }
}
