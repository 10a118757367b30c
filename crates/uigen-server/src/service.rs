//! MCP server implementation for UIGen projects.
//!
//! The `PreviewService` provides five tools:
//! 1. `open_project` - Open a project session, optionally from a project file
//! 2. `str_replace_editor` - View, create and edit files
//! 3. `file_manager` - Rename and delete files and directories
//! 4. `render_preview` - Build the live preview and report problems
//! 5. `close_project` - Close a project session

use crate::error::SessionError;
use crate::session::ProjectSession;
use crate::state::SessionRegistry;
use crate::types::{
    CloseProjectParams, EditorToolParams, FileManagerToolParams, OpenProjectParams,
    OpenProjectResult, RenderPreviewParams, RenderPreviewResult,
};
use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, tool, tool_handler, tool_router};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uigen_core::{PreviewConfig, Theme};
use uigen_files::VirtualFileSystem;
use uigen_tools::{GENERATION_PROMPT, Starter, ToolCall, ToolOutput};

/// MCP server for UIGen projects.
///
/// # Workflow
///
/// 1. Call `open_project` to get a session ID
/// 2. Edit files with `str_replace_editor` and `file_manager`
/// 3. Call `render_preview` to check the project compiles and renders
///
/// # Examples
///
/// ```no_run
/// use rmcp::ServiceExt;
/// use rmcp::transport::stdio;
/// use uigen_server::PreviewService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let service = PreviewService::new().serve(stdio()).await?;
/// service.waiting().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreviewService {
    /// Open project sessions
    registry: Arc<SessionRegistry>,

    /// Configuration for new sessions
    config: Arc<PreviewConfig>,

    /// Tool router for MCP protocol
    tool_router: ToolRouter<Self>,
}

impl PreviewService {
    /// Creates a service with the default preview configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PreviewConfig::default())
    }

    /// Creates a service whose sessions use `config`.
    #[must_use]
    pub fn with_config(config: PreviewConfig) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Open project sessions.
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    async fn session(&self, id: uuid::Uuid) -> Result<Arc<ProjectSession>, McpError> {
        self.registry.get(id).await.map_err(to_mcp_error)
    }

    async fn run(&self, id: uuid::Uuid, call: ToolCall) -> Result<CallToolResult, McpError> {
        let session = self.session(id).await?;
        let output = session.apply(&call).await.map_err(to_mcp_error)?;
        Ok(tool_result(&output))
    }
}

impl Default for PreviewService {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PreviewService {
    /// Open a project session.
    ///
    /// Loads `project_file` when given (an absent file starts an empty
    /// project that is created on the first edit) and seeds empty projects
    /// from `starter`.
    #[tool(
        description = "Open a UIGen project and return a session_id for the other tools. Optionally load and keep in sync a JSON project_file, and seed an empty project from a starter (blank, counter, card, contact-form)."
    )]
    async fn open_project(
        &self,
        Parameters(params): Parameters<OpenProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        let starter = params
            .starter
            .as_deref()
            .map(str::parse::<Starter>)
            .transpose()
            .map_err(|e| McpError::invalid_params(e, None))?;

        let config = PreviewConfig::clone(&self.config);
        let session = match &params.project_file {
            Some(path) => ProjectSession::open(path, config).await,
            None => ProjectSession::new(VirtualFileSystem::new(), config),
        }
        .map_err(to_mcp_error)?;

        if let Some(starter) = starter
            && session.file_count().await == 0
        {
            for call in starter.calls() {
                session.apply(&call).await.map_err(to_mcp_error)?;
            }
        }

        let file_count = session.file_count().await;
        let project_file = session.project_file().map(|p| p.display().to_string());
        let (session_id, expires_at) = self.registry.insert(session).await;
        info!(%session_id, file_count, "project opened");

        json_result(&OpenProjectResult {
            session_id,
            file_count,
            project_file,
            expires_at,
        })
    }

    /// View, create and edit files in a project.
    #[tool(
        description = "View, create and edit files in the project's virtual file system. Commands: view, create, str_replace, insert, undo_edit. Requires session_id from open_project."
    )]
    async fn str_replace_editor(
        &self,
        Parameters(params): Parameters<EditorToolParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(params.session_id, ToolCall::TextEditor(params.params))
            .await
    }

    /// Rename or delete files and directories in a project.
    #[tool(
        description = "Rename or delete files and directories in the project's virtual file system. Commands: rename (needs new_path), delete. Requires session_id from open_project."
    )]
    async fn file_manager(
        &self,
        Parameters(params): Parameters<FileManagerToolParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run(params.session_id, ToolCall::FileManager(params.params))
            .await
    }

    /// Build the live preview and report its state and problems.
    #[tool(
        description = "Build the live preview of the project. Returns the preview state (welcome, no_files, no_component, ready), the entry point and any unresolved imports or compile errors. Set include_html to get the document."
    )]
    async fn render_preview(
        &self,
        Parameters(params): Parameters<RenderPreviewParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.session(params.session_id).await?;
        let theme = params.dark.map(Theme::from_dark_flag);
        let update = session.render(theme).await.map_err(to_mcp_error)?;
        json_result(&RenderPreviewResult::from_update(update, params.include_html))
    }

    /// Close a project session.
    #[tool(description = "Close a project session. The project file, if any, is kept.")]
    async fn close_project(
        &self,
        Parameters(params): Parameters<CloseProjectParams>,
    ) -> Result<CallToolResult, McpError> {
        if !self.registry.remove(params.session_id).await {
            return Err(to_mcp_error(SessionError::NotFound {
                id: params.session_id,
            }));
        }
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Closed session {}",
            params.session_id
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for PreviewService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Build React components in a virtual file system. Call open_project \
                 first, edit with str_replace_editor and file_manager, and check the \
                 result with render_preview.\n\n{GENERATION_PROMPT}"
            )),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Maps a session failure to a protocol error.
fn to_mcp_error(err: SessionError) -> McpError {
    if err.is_not_found() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

/// Wraps tool output, flagging failures the agent should read.
fn tool_result(output: &ToolOutput) -> CallToolResult {
    let content = vec![Content::text(output.to_string())];
    if output.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize result: {e}"), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
