//! Editing tools for the UIGen agent loop.
//!
//! Two tools mutate a [`VirtualFileSystem`](uigen_files::VirtualFileSystem)
//! on behalf of an agent:
//!
//! - [`TextEditorTool`] (`str_replace_editor`): `view`, `create`,
//!   `str_replace`, `insert`, `undo_edit`
//! - [`FileManagerTool`] (`file_manager`): `rename`, `delete`
//!
//! Every command is validated before the file system changes, and every
//! failure comes back as a value the agent can read.
//!
//! # Examples
//!
//! ```
//! use uigen_files::VirtualFileSystem;
//! use uigen_tools::{TextEditorParams, TextEditorTool};
//!
//! let mut vfs = VirtualFileSystem::new();
//! vfs.create_file("/App.jsx", "const title = 'Hello';").unwrap();
//!
//! let out = TextEditorTool::new(&mut vfs)
//!     .execute(&TextEditorParams::str_replace("/App.jsx", "Hello", "Welcome"));
//!
//! assert!(out.contains("Replaced"));
//! assert_eq!(vfs.read_file("/App.jsx"), Some("const title = 'Welcome';"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod call;
pub mod file_manager;
pub mod prompt;
pub mod starter;
pub mod text_editor;
pub mod types;

pub use call::{ToolCall, ToolDefinition, ToolError, ToolOutput, definitions};
pub use file_manager::FileManagerTool;
pub use prompt::GENERATION_PROMPT;
pub use starter::Starter;
pub use text_editor::TextEditorTool;
pub use types::{
    FileManagerCommand, FileManagerParams, FileManagerResult, TextEditorCommand, TextEditorParams,
};
