//! Filter engine
//!
//! Every supplied predicate must hold. Comparisons are exact and ignore
//! case; an absent or empty predicate matches everything.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Task, TaskType};

/// Optional predicates over tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Equality under full Unicode lowercasing
fn eq_fold(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl TaskFilter {
    pub fn with_type(mut self, task_type: Option<TaskType>) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = assignee;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.applied().is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(task_type) = self.task_type {
            if task.task_type != task_type {
                return false;
            }
        }

        if let Some(status) = present(&self.status) {
            match task.status() {
                Some(actual) if eq_fold(actual.trim(), status) => {}
                _ => return false,
            }
        }

        if let Some(assignee) = present(&self.assignee) {
            if !task.assignees.iter().any(|a| eq_fold(a, assignee)) {
                return false;
            }
        }

        if let Some(label) = present(&self.label) {
            if !task.labels.iter().any(|l| eq_fold(&l.name, label)) {
                return false;
            }
        }

        true
    }

    /// Matching tasks in input order
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }

    /// Non-empty predicates as `key -> value`
    pub fn applied(&self) -> BTreeMap<String, String> {
        let mut applied = BTreeMap::new();
        if let Some(task_type) = self.task_type {
            applied.insert("type".to_string(), task_type.to_string());
        }
        if let Some(status) = present(&self.status) {
            applied.insert("status".to_string(), status.to_string());
        }
        if let Some(assignee) = present(&self.assignee) {
            applied.insert("assignee".to_string(), assignee.to_string());
        }
        if let Some(label) = present(&self.label) {
            applied.insert("label".to_string(), label.to_string());
        }
        applied
    }
}
