//! MCP server entry point for UIGen projects.
//!
//! # Usage
//!
//! Run the server via stdio transport:
//!
//! ```bash
//! uigen-mcp
//! ```
//!
//! Or configure it in an MCP client:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "uigen": {
//!       "command": "uigen-mcp"
//!     }
//!   }
//! }
//! ```
//!
//! Preview settings are read from `$XDG_CONFIG_HOME/uigen/config.toml` when
//! that file exists.

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uigen_core::PreviewConfig;
use uigen_server::PreviewService;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,uigen=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    tracing::info!("Starting uigen-mcp v{}", env!("CARGO_PKG_VERSION"));

    let config = PreviewConfig::load_or_default().context("failed to load preview config")?;

    let service = PreviewService::with_config(config).serve(stdio()).await?;
    service.waiting().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
