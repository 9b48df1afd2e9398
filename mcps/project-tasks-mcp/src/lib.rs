//! Project Tasks MCP Library
//!
//! Exposes the project-tasks query facade as three MCP tools:
//! `get_project_tasks_full`, `get_child_tasks` and `get_task_info`.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use project_tasks_mcp::ProjectTasksMcpServer;
//!
//! let server = ProjectTasksMcpServer::connect(Config::load()?)?;
//! let result = server
//!     .call_tool("get_task_info", serde_json::json!({ "project_id": 5, "task_number": 10 }))
//!     .await?;
//! ```

pub mod handlers;
pub mod params;
pub mod server;

pub use params::{ChildTasksParams, ProjectTasksParams, TaskInfoParams};
pub use server::{DispatchError, ProjectTasksMcpServer};
