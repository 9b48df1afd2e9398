//! Grid rendering with comfy-table

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use super::{header, truncate};
use crate::types::{ProjectMeta, Task};

const TITLE_WIDTH: usize = 50;
const REPO_WIDTH: usize = 30;
const DESCRIPTION_WIDTH: usize = 100;
const MAX_ASSIGNEES: usize = 3;

/// Render tasks as a grid under a project banner
pub fn render_table(project: &ProjectMeta, tasks: &[Task], show_description: bool) -> String {
    let mut out = header("Project", project, Some(tasks.len()), show_description);

    if tasks.is_empty() {
        out.push_str("No items found matching the criteria.\n");
        return out;
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers = vec!["Type", "#", "Title", "Repository", "State", "Author", "Assignees", "Status"];
    if show_description {
        headers.push("Description");
    }
    table.set_header(
        headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for task in tasks {
        let mut row = vec![
            Cell::new(task.task_type.label()),
            Cell::new(task.display_number()),
            Cell::new(truncate(&task.title, TITLE_WIDTH)),
            Cell::new(truncate(task.repository.as_deref().unwrap_or("-"), REPO_WIDTH)),
            Cell::new(task.state.map_or("-", |s| s.as_str())),
            Cell::new(task.author.as_deref().unwrap_or("-")),
            Cell::new(assignees_cell(task)),
            Cell::new(task.status().unwrap_or_else(|| "N/A".to_string())),
        ];
        if show_description {
            row.push(Cell::new(description_cell(task)));
        }
        table.add_row(row);
    }

    out.push_str(&table.to_string());
    out.push('\n');
    out
}

fn assignees_cell(task: &Task) -> String {
    let names: Vec<&str> = task.assignees.iter().map(String::as_str).collect();
    let mut cell = names
        .iter()
        .take(MAX_ASSIGNEES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > MAX_ASSIGNEES {
        cell.push_str(&format!(" (+{})", names.len() - MAX_ASSIGNEES));
    }
    if cell.is_empty() {
        cell.push('-');
    }
    cell
}

fn description_cell(task: &Task) -> String {
    let flat = task
        .body
        .as_deref()
        .unwrap_or_default()
        .replace(['\r', '\n'], " ");
    let flat = flat.trim();
    if flat.is_empty() {
        "N/A".to_string()
    } else {
        truncate(flat, DESCRIPTION_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::project;
    use crate::types::task::fixtures::issue;

    #[test]
    fn test_assignee_overflow() {
        let mut task = issue("I_1", 1, "One");
        for name in ["a", "b", "c", "d", "e"] {
            task.assignees.insert(name.into());
        }
        assert_eq!(assignees_cell(&task), "a, b, c (+2)");
    }

    #[test]
    fn test_description_is_flattened() {
        let mut task = issue("I_1", 1, "One");
        task.body = Some("line one\nline two".into());
        assert_eq!(description_cell(&task), "line one line two");
    }

    #[test]
    fn test_table_contains_rows() {
        let tasks = vec![issue("I_1", 1, "First task"), issue("I_2", 2, "Second task")];
        let out = render_table(&project(), &tasks, false);
        assert!(out.contains("Total items: 2"));
        assert!(out.contains("First task"));
        assert!(out.contains("#2"));
    }

    #[test]
    fn test_empty_table() {
        let out = render_table(&project(), &[], false);
        assert!(out.contains("No items found"));
    }
}
