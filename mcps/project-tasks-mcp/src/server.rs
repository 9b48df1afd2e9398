//! MCP Server implementation for project task retrieval

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde_json::Value;

use project_tasks::{Config, ProjectResult, ProjectTasks};

use crate::handlers;
use crate::params::{ChildTasksParams, ProjectTasksParams, TaskInfoParams};

/// Errors from in-process tool dispatch
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No tool with this name
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not match the tool's parameter schema
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The tool itself returned a protocol error
    #[error("mcp error: {0}")]
    Mcp(String),
}

impl From<McpError> for DispatchError {
    fn from(err: McpError) -> Self {
        DispatchError::Mcp(err.message.to_string())
    }
}

/// The Project Tasks MCP Server
#[derive(Clone)]
pub struct ProjectTasksMcpServer {
    tasks: Arc<ProjectTasks>,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProjectTasksMcpServer {
    /// Build a server backed by the given facade
    pub fn new(config: Config, tasks: ProjectTasks) -> Self {
        Self {
            tasks: Arc::new(tasks),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Build a server talking to the configured GraphQL endpoint.
    ///
    /// Fails when no credential resolves.
    pub fn connect(config: Config) -> ProjectResult<Self> {
        let tasks = ProjectTasks::connect(&config, None)?;
        Ok(Self::new(config, tasks))
    }

    #[tool(description = "Get all tasks of a GitHub Projects board with type, state, assignees, labels, custom fields and parent links. Optional filters: label, status, assignee, item_type. Bodies are omitted unless include_body is true.")]
    async fn get_project_tasks_full(
        &self,
        Parameters(params): Parameters<ProjectTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::project_tasks_full(&self.tasks, &self.config, params).await
    }

    #[tool(description = "Get the direct child tasks (sub-issues) of a task identified by task_id or task_number. Optional filters: label, status, assignee.")]
    async fn get_child_tasks(
        &self,
        Parameters(params): Parameters<ChildTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::child_tasks(&self.tasks, &self.config, params).await
    }

    #[tool(description = "Get one task with its full description, custom fields, parent and sub-issues, identified by task_id or task_number.")]
    async fn get_task_info(
        &self,
        Parameters(params): Parameters<TaskInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::task_info(&self.tasks, &self.config, params).await
    }
}

impl ProjectTasksMcpServer {
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Call a tool in-process with JSON arguments
    pub async fn call_tool(&self, name: &str, params: Value) -> Result<CallToolResult, DispatchError> {
        match name {
            "get_project_tasks_full" => {
                let params: ProjectTasksParams = serde_json::from_value(params)?;
                self.get_project_tasks_full(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "get_child_tasks" => {
                let params: ChildTasksParams = serde_json::from_value(params)?;
                self.get_child_tasks(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            "get_task_info" => {
                let params: TaskInfoParams = serde_json::from_value(params)?;
                self.get_task_info(Parameters(params))
                    .await
                    .map_err(Into::into)
            }
            _ => Err(DispatchError::ToolNotFound(name.to_string())),
        }
    }
}

#[tool_handler]
impl rmcp::ServerHandler for ProjectTasksMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Project Tasks MCP Server - reads GitHub Projects (v2) boards. Lists tasks \
                 with filters, returns the children of a task, and returns full task details \
                 including sub-issues. Read-only."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
