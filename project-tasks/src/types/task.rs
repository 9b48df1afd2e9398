//! Task type definitions
//!
//! A [`Task`] is the single shape every project item (issue, pull request
//! or draft issue) is normalized into.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Name of the custom field holding workflow status
pub const STATUS_FIELD: &str = "Status";

/// Kind of content behind a project item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Issue,
    PullRequest,
    DraftIssue,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Issue => "issue",
            TaskType::PullRequest => "pull_request",
            TaskType::DraftIssue => "draft_issue",
        }
    }

    /// Short label used in tables and trees
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Issue => "Issue",
            TaskType::PullRequest => "PR",
            TaskType::DraftIssue => "Draft",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = ProjectError;

    /// Accepts the snake-case names as well as the source's upper-case
    /// discriminators (`ISSUE`, `PULL_REQUEST`, `DRAFT_ISSUE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "issue" => Ok(TaskType::Issue),
            "pull_request" | "pr" => Ok(TaskType::PullRequest),
            "draft_issue" | "draft" => Ok(TaskType::DraftIssue),
            other => Err(ProjectError::usage(format!(
                "unknown task type '{}': expected issue, pull_request or draft_issue",
                other
            ))),
        }
    }
}

/// Lifecycle state of an issue or pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Open,
    Closed,
    Merged,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Open => "open",
            TaskState::Closed => "closed",
            TaskState::Merged => "merged",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Weak reference to another task: id plus cached display data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

/// Sub-issue reference as shown in a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubIssueRef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// Whether the sub-issue is itself an item of the fetched project
    pub in_project: bool,
}

/// Progress of an issue's sub-issues as reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubIssuesSummary {
    pub total: u32,
    pub completed: u32,
    pub percent_completed: u32,
}

/// Value of one custom project field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl FieldValue {
    /// Text form used for status comparison and display
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Unified representation of an issue, pull request or draft issue
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    /// Content node id; the key parent references point at
    pub id: String,
    /// Project item node id
    pub item_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// `owner/name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub assignees: BTreeSet<String>,
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    pub parent: Option<TaskRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_issues: Vec<SubIssueRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_issues_summary: Option<SubIssuesSummary>,
    pub project_fields: BTreeMap<String, FieldValue>,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Parent as reported by the source, before resolution
    #[serde(skip)]
    pub(crate) parent_hint: Option<TaskRef>,
    /// Sub-issues as reported by the source, before resolution
    #[serde(skip)]
    pub(crate) sub_issue_hints: Vec<TaskRef>,
}

impl Task {
    /// Look up a custom field by name, ignoring case
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.project_fields
            .get(name)
            .or_else(|| {
                self.project_fields
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
    }

    /// Value of the Status field, if set
    pub fn status(&self) -> Option<String> {
        self.field(STATUS_FIELD).map(FieldValue::as_text)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn to_ref(&self) -> TaskRef {
        TaskRef {
            id: self.id.clone(),
            title: self.title.clone(),
            number: self.number,
        }
    }

    /// Whether `key` names this task by content id or project item id
    pub fn is_identified_by(&self, key: &str) -> bool {
        self.id == key || self.item_id == key
    }

    /// `#12` for numbered tasks, the type label otherwise
    pub fn display_number(&self) -> String {
        match self.number {
            Some(n) => format!("#{}", n),
            None => "-".to_string(),
        }
    }

    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }
}
