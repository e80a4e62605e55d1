// Entry point of the Google Docs Markdown MCP server.
//
// **Architecture Overview:**
// - `core/` = Markdown parsing, edit compilation and the document service
// - `infra/` = Google Docs REST client implementing the core gateway trait
// - `mcp/` = MCP tool adapters served over stdio
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve the MCP tools on stdin/stdout

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "mcp/mcp_layer.rs"]
mod mcp;

use std::sync::Arc;

use anyhow::Context;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use crate::core::documents::{DocumentGateway, DocumentService};
use crate::infra::google_docs::GoogleDocsClient;
use crate::mcp::docs_server::DocsMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // stdout carries the MCP protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let client = GoogleDocsClient::from_env()
        .await
        .context("Failed to configure the Google Docs client")?;
    let gateway: Box<dyn DocumentGateway> = Box::new(client);
    let service = Arc::new(DocumentService::new(gateway));

    tracing::info!("Starting Google Docs markdown MCP server on stdio");

    let server = DocsMcpServer::new(service);
    let running = server
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server failed to start: {:?}", e))?;

    running.waiting().await?;
    tracing::info!("MCP client disconnected, shutting down");
    Ok(())
}
