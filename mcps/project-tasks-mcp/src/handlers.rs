//! Tool handler implementations
//!
//! Each handler validates its parameters, runs one facade operation and
//! turns the outcome into a tool result. Usage errors become
//! `invalid_params`; every other pipeline error is reported as a tool
//! result with `is_error` set and a JSON payload describing the failure.

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;
use serde_json::json;

use project_tasks::{Config, ProjectError, ProjectTasks, TaskFilter, TaskSelector, TaskType};

use crate::params::{ChildTasksParams, ProjectTasksParams, TaskInfoParams};

/// Pretty JSON success result
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Map a pipeline error onto the tool protocol
pub fn tool_error(err: ProjectError) -> Result<CallToolResult, McpError> {
    if let ProjectError::Usage(message) = &err {
        return Err(McpError::invalid_params(message.clone(), None));
    }

    tracing::warn!(kind = err.kind(), "tool call failed: {}", err);

    let mut payload = json!({
        "error": err.kind(),
        "message": err.to_string(),
        "retryable": err.is_retryable(),
    });
    if let ProjectError::RateLimit {
        reset_at,
        retry_after,
        ..
    } = &err
    {
        if let Some(reset_at) = reset_at {
            payload["reset_at"] = json!(reset_at.to_rfc3339());
        }
        if let Some(retry_after) = retry_after {
            payload["retry_after_secs"] = json!(retry_after.as_secs());
        }
    }

    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::error(vec![Content::text(text)]))
}

fn respond<T: Serialize>(outcome: Result<T, ProjectError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(data) => json_success(&data),
        Err(err) => tool_error(err),
    }
}

fn parse_item_type(value: Option<&str>) -> Result<Option<TaskType>, ProjectError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

pub async fn project_tasks_full(
    tasks: &ProjectTasks,
    config: &Config,
    params: ProjectTasksParams,
) -> Result<CallToolResult, McpError> {
    let prepared = config.resolve_org(params.org.as_deref()).and_then(|org| {
        let task_type = parse_item_type(params.item_type.as_deref())?;
        Ok((org, task_type))
    });
    let (org, task_type) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return tool_error(err),
    };

    let filter = TaskFilter::default()
        .with_type(task_type)
        .with_status(params.status)
        .with_assignee(params.assignee)
        .with_label(params.label);

    tracing::info!(org = %org, project = params.project_id, "get_project_tasks_full");
    respond(
        tasks
            .list_tasks(&org, params.project_id, &filter, params.include_body.unwrap_or(false))
            .await,
    )
}

pub async fn child_tasks(
    tasks: &ProjectTasks,
    config: &Config,
    params: ChildTasksParams,
) -> Result<CallToolResult, McpError> {
    let prepared = config.resolve_org(params.org.as_deref()).and_then(|org| {
        let selector = TaskSelector::from_options(params.task_id.clone(), params.task_number)?;
        Ok((org, selector))
    });
    let (org, selector) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return tool_error(err),
    };

    let filter = TaskFilter::default()
        .with_status(params.status)
        .with_assignee(params.assignee)
        .with_label(params.label);

    tracing::info!(org = %org, project = params.project_id, %selector, "get_child_tasks");
    respond(
        tasks
            .get_children(&org, params.project_id, &selector, &filter)
            .await,
    )
}

pub async fn task_info(
    tasks: &ProjectTasks,
    config: &Config,
    params: TaskInfoParams,
) -> Result<CallToolResult, McpError> {
    let prepared = config.resolve_org(params.org.as_deref()).and_then(|org| {
        let selector = TaskSelector::from_options(params.task_id.clone(), params.task_number)?;
        Ok((org, selector))
    });
    let (org, selector) = match prepared {
        Ok(prepared) => prepared,
        Err(err) => return tool_error(err),
    };

    tracing::info!(org = %org, project = params.project_id, %selector, "get_task_info");
    respond(
        tasks
            .get_task_detail(&org, params.project_id, &selector)
            .await,
    )
}
