//! Single-task detail view

use super::{detail_lines, task_line, BRANCH, LAST};
use crate::query::TaskDetail;

pub fn render_detail(detail: &TaskDetail) -> String {
    let task = &detail.task;
    let mut out = String::new();

    out.push_str(&format!("{}\n", task_line(task)));
    out.push_str(&format!("Project: {}\n", detail.project.title));
    out.push_str(&format!("Id: {} (item {})\n", task.id, task.item_id));
    for line in detail_lines(task, false, true) {
        out.push_str(&format!("  {}\n", line));
    }

    if let Some(body) = task.body.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        out.push_str("\nDescription:\n");
        for line in body.lines() {
            out.push_str(&format!("  {}\n", line.trim_end()));
        }
    }

    if !task.sub_issues.is_empty() {
        out.push_str(&format!("\nSub-issues ({}):\n", task.sub_issues.len()));
        for (i, sub) in task.sub_issues.iter().enumerate() {
            let connector = if i + 1 == task.sub_issues.len() { LAST } else { BRANCH };
            let number = sub.number.map(|n| format!(" #{}", n)).unwrap_or_default();
            let scope = if sub.in_project { "" } else { " [not in project]" };
            out.push_str(&format!("{}{}{}{}\n", connector, sub.title, number, scope));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::project;
    use crate::types::task::fixtures::issue;
    use crate::types::SubIssueRef;

    #[test]
    fn test_detail_shows_body_and_sub_issues() {
        let mut task = issue("I_1", 1, "Epic");
        task.body = Some("First line\nSecond line".into());
        task.sub_issues = vec![
            SubIssueRef {
                id: "I_2".into(),
                title: "Child".into(),
                number: Some(2),
                in_project: true,
            },
            SubIssueRef {
                id: "I_9".into(),
                title: "Elsewhere".into(),
                number: Some(9),
                in_project: false,
            },
        ];

        let out = render_detail(&TaskDetail {
            project: project(),
            task,
        });

        assert!(out.contains("  Second line"));
        assert!(out.contains("Sub-issues (2):"));
        assert!(out.contains(&format!("{}Child #2\n", BRANCH)));
        assert!(out.contains("Elsewhere #9 [not in project]"));
    }
}
