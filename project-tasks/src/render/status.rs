//! Status-grouped listing

use super::{detail_lines, header, task_line, BRANCH, LAST, PIPE, SPACE};
use crate::types::{ProjectMeta, Task};

const NO_STATUS: &str = "No Status";

/// Group tasks by their Status value in first-seen order
pub fn group_by_status(tasks: &[Task]) -> Vec<(String, Vec<&Task>)> {
    let mut groups: Vec<(String, Vec<&Task>)> = Vec::new();
    for task in tasks {
        let status = task.status().unwrap_or_else(|| NO_STATUS.to_string());
        match groups.iter_mut().find(|(name, _)| *name == status) {
            Some((_, members)) => members.push(task),
            None => groups.push((status, vec![task])),
        }
    }
    groups
}

pub fn render_status_groups(project: &ProjectMeta, tasks: &[Task], show_description: bool) -> String {
    let mut out = header("Project Status Groups", project, None, show_description);

    if tasks.is_empty() {
        out.push_str("No items found matching the criteria.\n");
        return out;
    }

    for (status, members) in group_by_status(tasks) {
        out.push_str(&format!("\n{} ({} items)\n", status, members.len()));
        for (i, task) in members.iter().enumerate() {
            let is_last = i + 1 == members.len();
            let connector = if is_last { LAST } else { BRANCH };
            out.push_str(&format!("{}{}\n", connector, task_line(task)));

            let detail_prefix = format!("{}{}", if is_last { SPACE } else { PIPE }, SPACE);
            for line in detail_lines(task, show_description, true) {
                out.push_str(&format!("{}{}\n", detail_prefix, line));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::project;
    use crate::types::task::fixtures::issue;
    use crate::types::FieldValue;

    fn with_status(mut task: Task, status: &str) -> Task {
        task.project_fields
            .insert("Status".into(), FieldValue::Text(status.into()));
        task
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let tasks = vec![
            with_status(issue("I_1", 1, "a"), "Done"),
            issue("I_2", 2, "b"),
            with_status(issue("I_3", 3, "c"), "Todo"),
            with_status(issue("I_4", 4, "d"), "Done"),
        ];
        let groups = group_by_status(&tasks);
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Done", "No Status", "Todo"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_render_counts() {
        let tasks = vec![with_status(issue("I_1", 1, "a"), "Done")];
        let out = render_status_groups(&project(), &tasks, false);
        assert!(out.contains("Done (1 items)"));
        assert!(out.contains(&format!("{}[Issue] a #1", LAST)));
    }
}
