//! Project Tasks MCP Server
//!
//! Serves the project task tools over stdio.
//!
//! # Configuration
//! Token from `GITHUB_TOKEN` (or the variable named by `github.token_env`),
//! default organization from `GITHUB_ORG`, file at `$PROJECT_TASKS_CONFIG`.

use rmcp::{transport::stdio, ServiceExt};
use tracing::level_filters::LevelFilter;

use project_tasks::logging::init_tracing;
use project_tasks::Config;
use project_tasks_mcp::ProjectTasksMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&["project_tasks_mcp", "project_tasks"], LevelFilter::INFO)?;

    tracing::info!("Starting Project Tasks MCP Server");

    let config = Config::load()?;
    if let Some(org) = &config.github.default_org {
        tracing::info!("Default organization: {}", org);
    }

    let server = ProjectTasksMcpServer::connect(config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
