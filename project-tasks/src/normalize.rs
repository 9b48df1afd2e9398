//! Item normalizer
//!
//! Maps a raw project item of any kind into a [`Task`]. The branch is chosen
//! by the item's kind discriminator alone.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::error::{ProjectError, ProjectResult};
use crate::graphql::types::{Actor, Connection, RawContent, RawIssueRef, RawItem};
use crate::types::{FieldValue, Label, SubIssuesSummary, Task, TaskRef, TaskState, TaskType};

/// Normalize every raw item, failing on the first malformed one
pub fn normalize_all(items: Vec<RawItem>) -> ProjectResult<Vec<Task>> {
    items.into_iter().map(normalize).collect()
}

/// Normalize one raw item
pub fn normalize(raw: RawItem) -> ProjectResult<Task> {
    let item_id = raw
        .id
        .clone()
        .ok_or_else(|| ProjectError::normalization("project item without an id"))?;

    let task_type = match raw.kind.as_deref() {
        Some("ISSUE") => TaskType::Issue,
        Some("PULL_REQUEST") => TaskType::PullRequest,
        Some("DRAFT_ISSUE") => TaskType::DraftIssue,
        Some(other) => {
            return Err(ProjectError::normalization(format!(
                "item {} has unsupported kind '{}'",
                item_id, other
            )))
        }
        None => {
            return Err(ProjectError::normalization(format!(
                "item {} has no kind",
                item_id
            )))
        }
    };

    let content = raw
        .content
        .ok_or_else(|| ProjectError::normalization(format!("item {} has no content", item_id)))?;

    let expected_typename = match task_type {
        TaskType::Issue => "Issue",
        TaskType::PullRequest => "PullRequest",
        TaskType::DraftIssue => "DraftIssue",
    };
    if let Some(typename) = content.typename.as_deref() {
        if typename != expected_typename {
            return Err(ProjectError::normalization(format!(
                "item {} is a {} but its content is a {}",
                item_id, task_type, typename
            )));
        }
    }

    let id = content.id.clone().ok_or_else(|| {
        ProjectError::normalization(format!("content of item {} has no id", item_id))
    })?;

    let project_fields = raw
        .field_values
        .map(extract_fields)
        .unwrap_or_default();

    let mut task = Task {
        id,
        item_id,
        task_type,
        title: content.title.clone().unwrap_or_default(),
        body: content.body.clone(),
        url: None,
        state: None,
        author: None,
        repository: None,
        assignees: logins(content.assignees.clone()),
        labels: Vec::new(),
        number: None,
        parent: None,
        sub_issues: Vec::new(),
        sub_issues_summary: None,
        project_fields,
        archived: raw.is_archived,
        created_at: content.created_at,
        updated_at: content.updated_at,
        parent_hint: None,
        sub_issue_hints: Vec::new(),
    };

    match task_type {
        TaskType::Issue => {
            apply_tracked(&mut task, &content)?;
            task.parent_hint = content.parent.map(issue_ref);
            task.sub_issue_hints = content
                .sub_issues
                .map(|subs| subs.into_nodes().map(issue_ref).collect())
                .unwrap_or_default();
            task.sub_issues_summary = content
                .sub_issues_summary
                .map(|s| {
                    if s.completed > s.total {
                        return Err(ProjectError::normalization(format!(
                            "issue {} reports {} of {} sub-issues completed",
                            task.id, s.completed, s.total
                        )));
                    }
                    Ok(SubIssuesSummary {
                        total: s.total,
                        completed: s.completed,
                        percent_completed: s.percent_completed,
                    })
                })
                .transpose()?;
        }
        TaskType::PullRequest => {
            apply_tracked(&mut task, &content)?;
            if content.merged == Some(true) {
                task.state = Some(TaskState::Merged);
            }
        }
        TaskType::DraftIssue => {
            task.author = content.creator.map(|c| c.login);
        }
    }

    Ok(task)
}

/// Fields shared by issues and pull requests
fn apply_tracked(task: &mut Task, content: &RawContent) -> ProjectResult<()> {
    task.number = Some(content.number.ok_or_else(|| {
        ProjectError::normalization(format!("{} {} has no number", task.task_type, task.id))
    })?);
    task.url = content.url.clone();
    task.author = content.author.as_ref().map(|a| a.login.clone());
    task.repository = content.repository.as_ref().map(|repo| match &repo.owner {
        Some(owner) => format!("{}/{}", owner.login, repo.name),
        None => repo.name.clone(),
    });
    task.labels = content
        .labels
        .clone()
        .map(|labels| {
            labels
                .into_nodes()
                .map(|l| Label {
                    name: l.name,
                    color: l.color,
                })
                .collect()
        })
        .unwrap_or_default();
    task.state = match content.state.as_deref() {
        Some("OPEN") => Some(TaskState::Open),
        Some("CLOSED") => Some(TaskState::Closed),
        Some("MERGED") => Some(TaskState::Merged),
        Some(other) => {
            warn!(task = %task.id, state = other, "unknown state");
            None
        }
        None => None,
    };
    Ok(())
}

fn logins(assignees: Option<Connection<Actor>>) -> BTreeSet<String> {
    assignees
        .map(|a| a.into_nodes().map(|actor| actor.login).collect())
        .unwrap_or_default()
}

fn issue_ref(raw: RawIssueRef) -> TaskRef {
    TaskRef {
        id: raw.id,
        title: raw.title.unwrap_or_default(),
        number: raw.number,
    }
}

/// Map field-value nodes to `field name -> value`
fn extract_fields(values: Connection<Value>) -> BTreeMap<String, FieldValue> {
    let mut fields = BTreeMap::new();
    for node in values.into_nodes() {
        let Some(name) = node
            .pointer("/field/name")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            warn!(
                typename = node.get("__typename").and_then(serde_json::Value::as_str).unwrap_or("unknown"),
                "field value without a field name skipped"
            );
            continue;
        };
        let value = field_value(&node).unwrap_or_else(|| FieldValue::Text(node.to_string()));
        fields.insert(name, value);
    }
    fields
}

/// Typed value for a known node shape; `None` sends the node through as raw text
fn field_value(node: &Value) -> Option<FieldValue> {
    let text = |key: &str| node.get(key).and_then(Value::as_str).map(str::to_string);

    match node.get("__typename").and_then(Value::as_str) {
        Some("ProjectV2ItemFieldTextValue") => text("text").map(FieldValue::Text),
        Some("ProjectV2ItemFieldNumberValue") => {
            node.get("number").and_then(Value::as_f64).map(FieldValue::Number)
        }
        Some("ProjectV2ItemFieldDateValue") => text("date").map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or(FieldValue::Text(d))
        }),
        Some("ProjectV2ItemFieldSingleSelectValue") => text("name").map(FieldValue::Text),
        Some("ProjectV2ItemFieldIterationValue") => text("title").map(FieldValue::Text),
        Some("ProjectV2ItemFieldUserValue") => joined(node, "/users/nodes", |n| n.get("login")),
        Some("ProjectV2ItemFieldLabelValue") => joined(node, "/labels/nodes", |n| n.get("name")),
        Some("ProjectV2ItemFieldReviewerValue") => joined(node, "/reviewers/nodes", |n| {
            n.get("login").or_else(|| n.get("name"))
        }),
        Some("ProjectV2ItemFieldPullRequestValue") => {
            let numbers: Vec<String> = node
                .pointer("/pullRequests/nodes")
                .and_then(Value::as_array)
                .map(|nodes| {
                    nodes
                        .iter()
                        .filter_map(|n| n.get("number").and_then(Value::as_u64))
                        .map(|n| format!("#{}", n))
                        .collect()
                })
                .unwrap_or_default();
            Some(FieldValue::Text(numbers.join(", ")))
        }
        Some("ProjectV2ItemFieldMilestoneValue") => node
            .pointer("/milestone/title")
            .and_then(Value::as_str)
            .map(|t| FieldValue::Text(t.to_string())),
        Some("ProjectV2ItemFieldRepositoryValue") => node
            .pointer("/repository/nameWithOwner")
            .and_then(Value::as_str)
            .map(|r| FieldValue::Text(r.to_string())),
        _ => None,
    }
}

/// Comma-joined strings picked from each node of a nested list
fn joined<'a, F>(node: &'a Value, pointer: &str, pick: F) -> Option<FieldValue>
where
    F: Fn(&'a Value) -> Option<&'a Value>,
{
    let nodes = node.pointer(pointer)?.as_array()?;
    let names: Vec<&str> = nodes
        .iter()
        .filter_map(|n| pick(n).and_then(Value::as_str))
        .collect();
    Some(FieldValue::Text(names.join(", ")))
}
