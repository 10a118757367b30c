//! Type definitions for MCP server tools.
//!
//! Editing tools take the same arguments as their in-process versions in
//! `uigen-tools`, plus the `session_id` returned by `open_project`.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uigen_preview::{Diagnostic, PreviewUpdate};
use uigen_tools::{FileManagerParams, TextEditorParams};
use uuid::Uuid;

// ============================================================================
// open_project types
// ============================================================================

/// Parameters for opening a project session.
///
/// # Examples
///
/// ```
/// use uigen_server::types::OpenProjectParams;
///
/// let params: OpenProjectParams =
///     serde_json::from_str(r#"{"starter": "counter"}"#).unwrap();
/// assert_eq!(params.starter.as_deref(), Some("counter"));
/// assert!(params.project_file.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct OpenProjectParams {
    /// JSON project file to load and keep in sync; created on first edit
    #[serde(default)]
    pub project_file: Option<PathBuf>,

    /// Starter to seed an empty project with: blank, counter, card, contact-form
    #[serde(default)]
    pub starter: Option<String>,
}

/// Result from opening a project session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpenProjectResult {
    /// Session ID for every other tool call
    pub session_id: Uuid,

    /// Number of files in the project
    pub file_count: usize,

    /// Project file the session persists to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_file: Option<String>,

    /// Session expiration time if left idle (ISO 8601)
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Editing tool types
// ============================================================================

/// Parameters for `str_replace_editor`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EditorToolParams {
    /// Session ID from `open_project`
    pub session_id: Uuid,

    /// Editor command and arguments
    #[serde(flatten)]
    pub params: TextEditorParams,
}

/// Parameters for `file_manager`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileManagerToolParams {
    /// Session ID from `open_project`
    pub session_id: Uuid,

    /// File manager command and arguments
    #[serde(flatten)]
    pub params: FileManagerParams,
}

// ============================================================================
// render_preview types
// ============================================================================

/// Parameters for rendering the live preview.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RenderPreviewParams {
    /// Session ID from `open_project`
    pub session_id: Uuid,

    /// Render with the dark theme; omit to keep the current theme
    #[serde(default)]
    pub dark: Option<bool>,

    /// Include the full HTML document in the result
    #[serde(default)]
    pub include_html: bool,
}

/// A preview problem reported to the agent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosticInfo {
    /// `unresolved_import`, `transform_failure`, `no_entry_point` or `empty_project`
    pub kind: String,

    /// File the problem was found in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Human-readable description
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            kind: diagnostic.kind.as_str().to_string(),
            file: diagnostic.file.clone(),
            message: diagnostic.message.clone(),
        }
    }
}

/// Result from rendering the live preview.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderPreviewResult {
    /// Preview generation that produced this result
    pub generation: u64,

    /// `welcome`, `no_files`, `no_component` or `ready`
    pub state: String,

    /// Entry point of the document, when ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Problems found in the project
    pub diagnostics: Vec<DiagnosticInfo>,

    /// The previous document is still shown because this build had errors
    pub kept_previous: bool,

    /// The HTML document, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl RenderPreviewResult {
    /// Summarizes an update, keeping the HTML only if asked to.
    #[must_use]
    pub fn from_update(update: PreviewUpdate, include_html: bool) -> Self {
        Self {
            generation: update.generation,
            state: update.state.as_str().to_string(),
            entry: update.entry.map(|entry| entry.to_string()),
            diagnostics: update.diagnostics.iter().map(DiagnosticInfo::from).collect(),
            kept_previous: update.kept_previous,
            html: include_html.then_some(update.html),
        }
    }
}

// ============================================================================
// close_project types
// ============================================================================

/// Parameters for closing a project session.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloseProjectParams {
    /// Session ID from `open_project`
    pub session_id: Uuid,
}
