//! Relationship tree rendering

use std::collections::{HashMap, HashSet};

use super::{detail_lines, header, task_line, BRANCH, LAST, PIPE, SPACE};
use crate::types::{ProjectMeta, Task};

/// Render tasks as parent/child trees.
///
/// A task whose parent is not among `tasks` is drawn as a root. Children
/// keep their input order.
pub fn render_tree(project: &ProjectMeta, tasks: &[Task], show_description: bool) -> String {
    let mut out = header("Project Relationship Tree", project, None, show_description);

    if tasks.is_empty() {
        out.push_str("No items found matching the criteria.\n");
        return out;
    }

    let present: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let mut children: HashMap<&str, Vec<&Task>> = HashMap::new();
    let mut roots = Vec::new();
    for task in tasks {
        match task.parent.as_ref().map(|p| p.id.as_str()) {
            Some(pid) if present.contains(pid) => children.entry(pid).or_default().push(task),
            _ => roots.push(task),
        }
    }

    let mut visited = HashSet::new();
    for (i, root) in roots.iter().enumerate() {
        let is_last = i + 1 == roots.len();
        render_node(&mut out, root, &children, "", is_last, show_description, &mut visited);
    }

    // tasks caught in a parent cycle never hang off a root
    let stranded: Vec<&Task> = tasks.iter().filter(|t| !visited.contains(t.id.as_str())).collect();
    if !stranded.is_empty() {
        out.push_str(&format!("\nUnreachable tasks ({}):\n", stranded.len()));
        for (i, task) in stranded.iter().enumerate() {
            let is_last = i + 1 == stranded.len();
            render_node(&mut out, task, &children, "", is_last, show_description, &mut visited);
        }
    }

    out
}

fn render_node<'a>(
    out: &mut String,
    task: &'a Task,
    children: &HashMap<&str, Vec<&'a Task>>,
    prefix: &str,
    is_last: bool,
    show_description: bool,
    visited: &mut HashSet<&'a str>,
) {
    if !visited.insert(task.id.as_str()) {
        return;
    }

    let connector = if is_last { LAST } else { BRANCH };
    out.push_str(&format!("{}{}{}\n", prefix, connector, task_line(task)));

    let child_prefix = format!("{}{}", prefix, if is_last { SPACE } else { PIPE });
    let kids = children.get(task.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
    let detail_prefix = format!("{}{}", child_prefix, if kids.is_empty() { SPACE } else { PIPE });
    for line in detail_lines(task, show_description, false) {
        out.push_str(&format!("{}{}\n", detail_prefix, line));
    }

    for (i, child) in kids.iter().enumerate() {
        let last_child = i + 1 == kids.len();
        render_node(out, child, children, &child_prefix, last_child, show_description, visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::project;
    use crate::types::task::fixtures::issue;

    #[test]
    fn test_children_nest_under_parent_in_order() {
        let parent = issue("I_1", 1, "Parent");
        let mut b = issue("I_3", 3, "Second child");
        b.parent = Some(parent.to_ref());
        let mut a = issue("I_2", 2, "First child");
        a.parent = Some(parent.to_ref());
        let loner = issue("I_4", 4, "Loner");

        let out = render_tree(&project(), &[parent, a, b, loner], false);

        let pos = |needle: &str| out.find(needle).unwrap();
        assert!(pos("Parent #1") < pos("First child #2"));
        assert!(pos("First child #2") < pos("Second child #3"));
        assert!(pos("Second child #3") < pos("Loner #4"));
        assert!(out.contains(&format!("{}{}[Issue] Second child", PIPE, LAST)));
        assert!(!out.contains("Unreachable"));
    }

    #[test]
    fn test_parent_outside_set_is_root() {
        let parent = issue("I_1", 1, "Parent");
        let mut child = issue("I_2", 2, "Child");
        child.parent = Some(parent.to_ref());

        let out = render_tree(&project(), &[child], false);
        assert!(out.contains(&format!("{}[Issue] Child", LAST)));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut a = issue("I_1", 1, "A");
        let mut b = issue("I_2", 2, "B");
        a.parent = Some(b.to_ref());
        b.parent = Some(a.to_ref());

        let out = render_tree(&project(), &[a, b], false);
        assert!(out.contains("Unreachable tasks (2)"));
        assert_eq!(out.matches("[Issue] A").count(), 1);
    }
}
