//! Tool parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProjectTasksParams {
    #[schemars(description = "GitHub organization login (optional when a default organization is configured)")]
    #[serde(default)]
    pub org: Option<String>,

    #[schemars(description = "Project number as shown in the project URL")]
    pub project_id: u64,

    #[schemars(description = "Only tasks carrying this label")]
    #[serde(default)]
    pub label: Option<String>,

    #[schemars(description = "Only tasks whose Status field equals this value (e.g. 'Todo', 'In Progress', 'Done')")]
    #[serde(default)]
    pub status: Option<String>,

    #[schemars(description = "Only tasks assigned to this login")]
    #[serde(default)]
    pub assignee: Option<String>,

    #[schemars(description = "Only this item type: issue, pull_request or draft_issue")]
    #[serde(default)]
    pub item_type: Option<String>,

    #[schemars(description = "Include task bodies (default: false)")]
    #[serde(default)]
    pub include_body: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ChildTasksParams {
    #[schemars(description = "GitHub organization login (optional when a default organization is configured)")]
    #[serde(default)]
    pub org: Option<String>,

    #[schemars(description = "Project number as shown in the project URL")]
    pub project_id: u64,

    #[schemars(description = "Parent task id (content node id or project item id); use this or task_number")]
    #[serde(default)]
    pub task_id: Option<String>,

    #[schemars(description = "Parent issue number; use this or task_id")]
    #[serde(default)]
    pub task_number: Option<u64>,

    #[schemars(description = "Only children carrying this label")]
    #[serde(default)]
    pub label: Option<String>,

    #[schemars(description = "Only children whose Status field equals this value")]
    #[serde(default)]
    pub status: Option<String>,

    #[schemars(description = "Only children assigned to this login")]
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaskInfoParams {
    #[schemars(description = "GitHub organization login (optional when a default organization is configured)")]
    #[serde(default)]
    pub org: Option<String>,

    #[schemars(description = "Project number as shown in the project URL")]
    pub project_id: u64,

    #[schemars(description = "Task id (content node id or project item id); use this or task_number")]
    #[serde(default)]
    pub task_id: Option<String>,

    #[schemars(description = "Issue or pull request number; use this or task_id")]
    #[serde(default)]
    pub task_number: Option<u64>,
}
