//! MCP server for UIGen projects.
//!
//! Exposes the UIGen editing tools and the live preview to an agent over
//! the Model Context Protocol. Each agent conversation opens a project
//! session that owns one virtual file system and one preview session.
//!
//! # Architecture
//!
//! The server implements five tools:
//!
//! 1. **`open_project`** - Start a session, optionally from a JSON project file
//!    or a starter
//! 2. **`str_replace_editor`** - View, create and edit files
//! 3. **`file_manager`** - Rename and delete files and directories
//! 4. **`render_preview`** - Build the preview, report state and diagnostics
//! 5. **`close_project`** - End a session
//!
//! # Examples
//!
//! ```no_run
//! use rmcp::ServiceExt;
//! use rmcp::transport::stdio;
//! use uigen_server::PreviewService;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = PreviewService::new().serve(stdio()).await?;
//! service.waiting().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # State Management
//!
//! Sessions live in a [`SessionRegistry`] and expire after 60 minutes
//! without a tool call. A session with a project file writes the file after
//! every successful mutation, so an expired session can be reopened.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod service;
pub mod session;
pub mod state;
pub mod types;

pub use error::SessionError;
pub use service::PreviewService;
pub use session::ProjectSession;
pub use state::SessionRegistry;
pub use types::{
    CloseProjectParams, DiagnosticInfo, EditorToolParams, FileManagerToolParams,
    OpenProjectParams, OpenProjectResult, RenderPreviewParams, RenderPreviewResult,
};
