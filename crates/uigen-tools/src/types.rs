//! Wire types for the editing tools.
//!
//! Field names follow the text-editor tool convention agents are trained
//! on (`command`, `path`, `file_text`, `old_str`, ...). Doc comments on the
//! parameter structs become descriptions in the published JSON schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// str_replace_editor types
// ============================================================================

/// Text editor sub-command.
///
/// Unknown command names deserialize to [`TextEditorCommand::Unknown`] so the
/// tool can answer with an error value instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextEditorCommand {
    /// Show a file with line numbers, or list a directory
    View,
    /// Create a new file
    Create,
    /// Replace one unique occurrence of a string
    StrReplace,
    /// Insert text after a given line
    Insert,
    /// Revert the last edit (not supported)
    UndoEdit,
    /// Anything else
    #[schemars(skip)]
    Unknown,
}

impl TextEditorCommand {
    /// Returns the wire name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::StrReplace => "str_replace",
            Self::Insert => "insert",
            Self::UndoEdit => "undo_edit",
            Self::Unknown => "unknown",
        }
    }

    fn from_wire(name: &str) -> Self {
        match name {
            "view" => Self::View,
            "create" => Self::Create,
            "str_replace" => Self::StrReplace,
            "insert" => Self::Insert,
            "undo_edit" => Self::UndoEdit,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for TextEditorCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&name))
    }
}

impl fmt::Display for TextEditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the `str_replace_editor` tool.
///
/// # Examples
///
/// ```
/// use uigen_tools::{TextEditorCommand, TextEditorParams};
///
/// let params: TextEditorParams = serde_json::from_str(
///     r#"{"command": "create", "path": "/App.jsx", "file_text": "export default 1"}"#,
/// ).unwrap();
///
/// assert_eq!(params.command, TextEditorCommand::Create);
/// assert_eq!(params.file_text.as_deref(), Some("export default 1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextEditorParams {
    /// One of `view`, `create`, `str_replace`, `insert`, `undo_edit`
    pub command: TextEditorCommand,

    /// Absolute path of the file or directory, e.g. `/App.jsx`
    pub path: String,

    /// Full content of the new file (`create`); defaults to empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_text: Option<String>,

    /// Line after which `new_str` is inserted; 0 inserts at the top (`insert`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_line: Option<usize>,

    /// Replacement text (`str_replace`) or text to insert (`insert`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_str: Option<String>,

    /// Exact text to replace; must occur exactly once (`str_replace`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_str: Option<String>,

    /// Inclusive 1-based `[start, end]` line range; `end = -1` means end of file (`view`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_range: Option<Vec<i64>>,

    /// Unused by this tool; accepted for compatibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

impl TextEditorParams {
    /// Parameters for `command` on `path` with every optional field unset.
    #[must_use]
    pub fn new(command: TextEditorCommand, path: impl Into<String>) -> Self {
        Self {
            command,
            path: path.into(),
            file_text: None,
            insert_line: None,
            new_str: None,
            old_str: None,
            view_range: None,
            new_path: None,
        }
    }

    /// `view` parameters.
    #[must_use]
    pub fn view(path: impl Into<String>) -> Self {
        Self::new(TextEditorCommand::View, path)
    }

    /// `create` parameters.
    #[must_use]
    pub fn create(path: impl Into<String>, file_text: impl Into<String>) -> Self {
        Self {
            file_text: Some(file_text.into()),
            ..Self::new(TextEditorCommand::Create, path)
        }
    }

    /// `str_replace` parameters.
    #[must_use]
    pub fn str_replace(
        path: impl Into<String>,
        old_str: impl Into<String>,
        new_str: impl Into<String>,
    ) -> Self {
        Self {
            old_str: Some(old_str.into()),
            new_str: Some(new_str.into()),
            ..Self::new(TextEditorCommand::StrReplace, path)
        }
    }

    /// `insert` parameters.
    #[must_use]
    pub fn insert(path: impl Into<String>, insert_line: usize, new_str: impl Into<String>) -> Self {
        Self {
            insert_line: Some(insert_line),
            new_str: Some(new_str.into()),
            ..Self::new(TextEditorCommand::Insert, path)
        }
    }

    /// Sets the `view_range`.
    #[must_use]
    pub fn with_view_range(mut self, start: i64, end: i64) -> Self {
        self.view_range = Some(vec![start, end]);
        self
    }
}

// ============================================================================
// file_manager types
// ============================================================================

/// File manager sub-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileManagerCommand {
    /// Move a file or directory
    Rename,
    /// Delete a file, or a directory recursively
    Delete,
    /// Anything else
    #[schemars(skip)]
    Unknown,
}

impl FileManagerCommand {
    /// Returns the wire name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::Delete => "delete",
            Self::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for FileManagerCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "rename" => Self::Rename,
            "delete" => Self::Delete,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for FileManagerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the `file_manager` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileManagerParams {
    /// `rename` or `delete`
    pub command: FileManagerCommand,

    /// Absolute path of the file or directory to act on
    pub path: String,

    /// Destination path (required for `rename`); parents are created as needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

impl FileManagerParams {
    /// `rename` parameters.
    #[must_use]
    pub fn rename(path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            command: FileManagerCommand::Rename,
            path: path.into(),
            new_path: Some(new_path.into()),
        }
    }

    /// `delete` parameters.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            command: FileManagerCommand::Delete,
            path: path.into(),
            new_path: None,
        }
    }
}

/// Result of a `file_manager` call.
///
/// Exactly one of `message` (on success) and `error` (on failure) is set.
///
/// # Examples
///
/// ```
/// use uigen_tools::FileManagerResult;
///
/// let result = FileManagerResult::failure("Invalid command");
/// assert_eq!(
///     serde_json::to_string(&result).unwrap(),
///     r#"{"success":false,"error":"Invalid command"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileManagerResult {
    /// Whether the command succeeded
    pub success: bool,

    /// Human-readable outcome on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileManagerResult {
    /// Successful result with a message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failed result with an error.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
