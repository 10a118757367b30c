//! Tool dispatch for hosts that receive calls as JSON.
//!
//! A [`ToolCall`] names one of the two editing tools together with its
//! arguments; executing it against a file system yields a [`ToolOutput`].

use crate::file_manager::FileManagerTool;
use crate::text_editor::TextEditorTool;
use crate::types::{FileManagerParams, FileManagerResult, TextEditorParams};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use uigen_files::VirtualFileSystem;

/// Errors raised while decoding a tool call.
///
/// Execution itself never fails; these cover calls that cannot be routed.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool name matches neither editing tool
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// Name as received
        name: String,
    },

    /// Arguments do not match the tool's parameter schema
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        /// Tool the arguments were meant for
        tool: &'static str,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    /// Returns `true` if the tool name was not recognized.
    #[must_use]
    pub const fn is_unknown_tool(&self) -> bool {
        matches!(self, Self::UnknownTool { .. })
    }

    /// Returns `true` if the arguments failed to decode.
    #[must_use]
    pub const fn is_invalid_arguments(&self) -> bool {
        matches!(self, Self::InvalidArguments { .. })
    }
}

/// One call to an editing tool.
///
/// Serializes as `{"name": <tool id>, "arguments": {...}}`.
///
/// # Examples
///
/// ```
/// use uigen_files::VirtualFileSystem;
/// use uigen_tools::ToolCall;
///
/// let call = ToolCall::from_json(
///     r#"{"name": "str_replace_editor", "arguments": {"command": "create", "path": "/App.jsx", "file_text": "x"}}"#,
/// ).unwrap();
///
/// let mut vfs = VirtualFileSystem::new();
/// let output = call.execute(&mut vfs);
/// assert!(!output.is_error());
/// assert_eq!(vfs.read_file("/App.jsx"), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "arguments")]
pub enum ToolCall {
    /// `str_replace_editor`
    #[serde(rename = "str_replace_editor")]
    TextEditor(TextEditorParams),
    /// `file_manager`
    #[serde(rename = "file_manager")]
    FileManager(FileManagerParams),
}

#[derive(Deserialize)]
struct RawCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl ToolCall {
    /// Routes `arguments` to the tool called `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` for unrecognized names and `InvalidArguments`
    /// when the arguments do not decode.
    pub fn from_parts(name: &str, arguments: Value) -> Result<Self, ToolError> {
        if name == TextEditorTool::ID {
            serde_json::from_value(arguments)
                .map(Self::TextEditor)
                .map_err(|source| ToolError::InvalidArguments {
                    tool: TextEditorTool::ID,
                    source,
                })
        } else if name == FileManagerTool::ID {
            serde_json::from_value(arguments)
                .map(Self::FileManager)
                .map_err(|source| ToolError::InvalidArguments {
                    tool: FileManagerTool::ID,
                    source,
                })
        } else {
            Err(ToolError::UnknownTool {
                name: name.to_string(),
            })
        }
    }

    /// Decodes a `{"name", "arguments"}` object.
    ///
    /// # Errors
    ///
    /// Same as [`ToolCall::from_parts`]; a malformed envelope reports
    /// `InvalidArguments` against an empty tool name.
    pub fn from_json(json: &str) -> Result<Self, ToolError> {
        let raw: RawCall =
            serde_json::from_str(json).map_err(|source| ToolError::InvalidArguments {
                tool: "",
                source,
            })?;
        Self::from_parts(&raw.name, raw.arguments)
    }

    /// Tool id of this call.
    #[must_use]
    pub const fn tool(&self) -> &'static str {
        match self {
            Self::TextEditor(_) => TextEditorTool::ID,
            Self::FileManager(_) => FileManagerTool::ID,
        }
    }

    /// Runs the call.
    pub fn execute(&self, vfs: &mut VirtualFileSystem) -> ToolOutput {
        match self {
            Self::TextEditor(params) => ToolOutput::Text(TextEditorTool::new(vfs).execute(params)),
            Self::FileManager(params) => {
                ToolOutput::FileManager(FileManagerTool::new(vfs).execute(params))
            }
        }
    }
}

/// Result of a tool call, shaped the way each tool reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// Text editor result
    Text(String),
    /// File manager result
    FileManager(FileManagerResult),
}

impl ToolOutput {
    /// Returns `true` if the call failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        match self {
            Self::Text(text) => text.starts_with("Error"),
            Self::FileManager(result) => !result.success,
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::FileManager(result) => {
                let json = serde_json::to_string(result).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Name, description and parameter schema of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Tool id
    pub name: &'static str,
    /// What the tool does
    pub description: &'static str,
    /// JSON schema of the arguments
    pub input_schema: Value,
}

/// Definitions of both editing tools, text editor first.
///
/// # Examples
///
/// ```
/// let defs = uigen_tools::definitions();
/// assert_eq!(defs[0].name, "str_replace_editor");
/// assert_eq!(defs[1].name, "file_manager");
/// ```
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: TextEditorTool::ID,
            description: TextEditorTool::DESCRIPTION,
            input_schema: serde_json::to_value(schema_for!(TextEditorParams)).unwrap_or_default(),
        },
        ToolDefinition {
            name: FileManagerTool::ID,
            description: FileManagerTool::DESCRIPTION,
            input_schema: serde_json::to_value(schema_for!(FileManagerParams)).unwrap_or_default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_serializes_with_name_and_arguments() {
        let call = ToolCall::FileManager(FileManagerParams::delete("/a.jsx"));
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({"name": "file_manager", "arguments": {"command": "delete", "path": "/a.jsx"}})
        );
    }

    #[test]
    fn test_serialized_call_decodes_again() {
        let call = ToolCall::TextEditor(TextEditorParams::insert("/a.jsx", 2, "x"));
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(ToolCall::from_json(&json).unwrap(), call);
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolCall::from_parts("bash", json!({})).unwrap_err();
        assert!(err.is_unknown_tool());
        assert_eq!(err.to_string(), "Unknown tool: bash");
    }

    #[test]
    fn test_missing_path_is_invalid_arguments() {
        let err = ToolCall::from_parts("file_manager", json!({"command": "delete"})).unwrap_err();
        assert!(err.is_invalid_arguments());
    }

    #[test]
    fn test_output_error_detection() {
        assert!(ToolOutput::Text("Error: nope".to_string()).is_error());
        assert!(!ToolOutput::Text("File created: /a".to_string()).is_error());
        assert!(ToolOutput::FileManager(FileManagerResult::failure("x")).is_error());
    }

    #[test]
    fn test_file_manager_output_displays_as_json() {
        let output = ToolOutput::FileManager(FileManagerResult::success("ok"));
        assert_eq!(output.to_string(), r#"{"success":true,"message":"ok"}"#);
    }

    #[test]
    fn test_definitions_publish_schemas() {
        let defs = definitions();
        let editor = &defs[0].input_schema;
        assert!(editor["properties"]["command"].is_object());
        assert!(editor["properties"]["view_range"].is_object());
        let required = editor["required"].as_array().unwrap();
        assert!(required.contains(&json!("command")));
        assert!(required.contains(&json!("path")));
        assert!(!required.contains(&json!("file_text")));
    }
}
