//! Text renderers for facade results
//!
//! All renderers are pure: they take facade output and return a `String`.

pub mod detail;
pub mod status;
pub mod table;
pub mod tree;

use serde::Serialize;

use crate::types::{ProjectMeta, Task, STATUS_FIELD};

pub use detail::render_detail;
pub use status::render_status_groups;
pub use table::render_table;
pub use tree::render_tree;

/// Box-drawing connectors
pub(crate) const BRANCH: &str = "├── ";
pub(crate) const LAST: &str = "└── ";
pub(crate) const PIPE: &str = "│   ";
pub(crate) const SPACE: &str = "    ";

const RULE_WIDTH: usize = 80;

/// Pretty JSON of any facade result
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Project banner shared by the text renderers
pub(crate) fn header(
    heading: &str,
    project: &ProjectMeta,
    total: Option<usize>,
    show_description: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", heading, project.title));
    out.push_str(&format!(
        "Description: {}\n",
        project.description.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!("URL: {}\n", project.url));
    if let Some(total) = total {
        out.push_str(&format!("Total items: {}\n", total));
    }
    if show_description {
        out.push_str("Task descriptions will be shown\n");
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// One-line heading for a task: title, number and repository
pub(crate) fn task_line(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.task_type.label(), task.title);
    if let Some(number) = task.number {
        line.push_str(&format!(" #{}", number));
    }
    if let Some(repo) = &task.repository {
        line.push_str(&format!(" ({})", repo));
    }
    line
}

/// Indented detail lines printed under a task heading
pub(crate) fn detail_lines(task: &Task, show_description: bool, show_parent: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if show_description {
        if let Some(body) = task.body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            lines.push("Description:".to_string());
            lines.extend(body.lines().map(|l| format!("   {}", l.trim_end())));
        }
    }
    if let Some(author) = &task.author {
        lines.push(format!("Author: {}", author));
    }
    if !task.assignees.is_empty() {
        let names: Vec<&str> = task.assignees.iter().map(String::as_str).collect();
        lines.push(format!("Assignees: {}", names.join(", ")));
    }
    if let Some(state) = task.state {
        lines.push(format!("State: {}", state));
    }
    if !task.labels.is_empty() {
        let names: Vec<&str> = task.labels.iter().map(|l| l.name.as_str()).collect();
        lines.push(format!("Labels: {}", names.join(", ")));
    }
    if let Some(summary) = task.sub_issues_summary {
        lines.push(format!(
            "Sub-issues: {}/{} completed ({}%)",
            summary.completed, summary.total, summary.percent_completed
        ));
    }
    if show_parent {
        if let Some(parent) = &task.parent {
            let number = parent.number.map(|n| format!(" #{}", n)).unwrap_or_default();
            lines.push(format!("Parent: {}{}", parent.title, number));
        }
    }
    if let Some(status) = task.status() {
        lines.push(format!("Status: {}", status));
    }
    for (name, value) in &task.project_fields {
        if name.eq_ignore_ascii_case(STATUS_FIELD) || name.eq_ignore_ascii_case("Title") {
            continue;
        }
        let value = value.to_string();
        if !value.is_empty() && value.chars().count() < 100 {
            lines.push(format!("{}: {}", name, value));
        }
    }
    if let Some(url) = &task.url {
        lines.push(url.clone());
    }

    lines
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::task::fixtures::issue;
    use crate::types::FieldValue;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_detail_lines_skip_status_in_extra_fields() {
        let mut task = issue("I_1", 1, "One");
        task.project_fields
            .insert("Status".into(), FieldValue::Text("Todo".into()));
        task.project_fields
            .insert("Priority".into(), FieldValue::Text("P1".into()));

        let lines = detail_lines(&task, false, true);
        assert_eq!(lines.iter().filter(|l| l.starts_with("Status:")).count(), 1);
        assert!(lines.contains(&"Priority: P1".to_string()));
    }

    #[test]
    fn test_header_without_description() {
        let mut project = test_support::project();
        project.description = None;
        let out = header("Project", &project, None, false);
        assert!(out.contains("Description: N/A"));
    }
}
