//! Hierarchy assembler
//!
//! Indexes tasks by id and resolves parent references into weak
//! [`TaskRef`]s. A parent outside the fetched set is left unresolved.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ProjectError, ProjectResult};
use crate::types::{SubIssueRef, Task};

/// Tasks of one fetch session with resolved parent links
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    by_id: HashMap<String, Task>,
    order: Vec<String>,
}

impl Hierarchy {
    /// Index `tasks` and resolve parents.
    ///
    /// The explicit parent reference wins. A task without one that appears
    /// in another fetched task's sub-issue list is linked to that task.
    pub fn assemble(tasks: Vec<Task>) -> ProjectResult<Self> {
        let mut by_id = HashMap::with_capacity(tasks.len());
        let mut order = Vec::with_capacity(tasks.len());

        for task in tasks {
            if by_id.contains_key(&task.id) {
                return Err(ProjectError::normalization(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
            order.push(task.id.clone());
            by_id.insert(task.id.clone(), task);
        }

        // child id -> parent id from sub-issue lists, first listing wins
        let mut listed_parent: HashMap<String, String> = HashMap::new();
        for id in &order {
            for sub in &by_id[id].sub_issue_hints {
                listed_parent
                    .entry(sub.id.clone())
                    .or_insert_with(|| id.clone());
            }
        }

        let mut resolved = Vec::new();
        for id in &order {
            let task = &by_id[id];
            let explicit = task
                .parent_hint
                .as_ref()
                .map(|p| p.id.as_str())
                .filter(|pid| by_id.contains_key(*pid) && *pid != id.as_str());
            let parent_id = explicit.or_else(|| {
                listed_parent
                    .get(id)
                    .map(String::as_str)
                    .filter(|pid| *pid != id.as_str())
            });
            if let Some(pid) = parent_id {
                resolved.push((id.clone(), by_id[pid].to_ref()));
            }
        }

        debug!(tasks = order.len(), linked = resolved.len(), "assembled hierarchy");
        for (id, parent) in resolved {
            if let Some(task) = by_id.get_mut(&id) {
                task.parent = Some(parent);
            }
        }

        Ok(Self { by_id, order })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All tasks in source order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Look up by content id or project item id
    pub fn get(&self, key: &str) -> Option<&Task> {
        self.by_id
            .get(key)
            .or_else(|| self.tasks().find(|t| t.item_id == key))
    }

    /// All tasks carrying `number` (may span repositories)
    pub fn find_by_number(&self, number: u64) -> Vec<&Task> {
        self.tasks().filter(|t| t.number == Some(number)).collect()
    }

    /// Tasks without a resolved parent, in source order
    pub fn roots(&self) -> Vec<&Task> {
        self.tasks().filter(|t| t.parent.is_none()).collect()
    }

    /// Direct children of `id`, in source order
    pub fn children_of(&self, id: &str) -> Vec<&Task> {
        self.tasks()
            .filter(|t| t.parent.as_ref().is_some_and(|p| p.id == id))
            .collect()
    }

    /// Copy of a task with its sub-issue list hydrated
    pub fn with_sub_issues(&self, id: &str) -> Option<Task> {
        let mut task = self.by_id.get(id)?.clone();
        let mut seen = HashSet::new();

        let mut subs: Vec<SubIssueRef> = task
            .sub_issue_hints
            .iter()
            .filter(|r| seen.insert(r.id.clone()))
            .map(|r| SubIssueRef {
                id: r.id.clone(),
                title: self.by_id.get(&r.id).map_or_else(|| r.title.clone(), |t| t.title.clone()),
                number: r.number,
                in_project: self.by_id.contains_key(&r.id),
            })
            .collect();

        // children linked by their own parent reference but missing from the list
        for child in self.children_of(id) {
            if seen.insert(child.id.clone()) {
                subs.push(SubIssueRef {
                    id: child.id.clone(),
                    title: child.title.clone(),
                    number: child.number,
                    in_project: true,
                });
            }
        }

        task.sub_issues = subs;
        Some(task)
    }

    pub fn into_tasks(mut self) -> Vec<Task> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::task::fixtures::issue;
    use crate::types::TaskRef;

    fn hint(task: &Task) -> TaskRef {
        task.to_ref()
    }

    #[test]
    fn test_parent_resolution_and_roots() {
        let parent = issue("I_10", 10, "Parent");
        let mut child_a = issue("I_11", 11, "A");
        child_a.parent_hint = Some(hint(&parent));
        let mut child_b = issue("I_12", 12, "B");
        child_b.parent_hint = Some(hint(&parent));
        let other = issue("I_20", 20, "Other");

        let h = Hierarchy::assemble(vec![child_b, parent, other, child_a]).unwrap();

        let roots: Vec<_> = h.roots().iter().map(|t| t.id.clone()).collect();
        assert_eq!(roots, vec!["I_10", "I_20"]);

        let children: Vec<_> = h.children_of("I_10").iter().map(|t| t.id.clone()).collect();
        assert_eq!(children, vec!["I_12", "I_11"]);
        assert_eq!(h.get("I_11").unwrap().parent.as_ref().unwrap().number, Some(10));
    }

    #[test]
    fn test_parent_outside_project_stays_absent() {
        let mut child = issue("I_11", 11, "Child");
        child.parent_hint = Some(TaskRef {
            id: "I_elsewhere".into(),
            title: "Elsewhere".into(),
            number: Some(1),
        });
        let h = Hierarchy::assemble(vec![child]).unwrap();
        assert!(h.get("I_11").unwrap().parent.is_none());
        assert_eq!(h.roots().len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_error() {
        let err = Hierarchy::assemble(vec![issue("I_1", 1, "a"), issue("I_1", 1, "b")]).unwrap_err();
        assert!(matches!(err, ProjectError::Normalization(_)));
    }

    #[test]
    fn test_sub_issue_list_links_child_when_parent_missing() {
        let mut parent = issue("I_10", 10, "Parent");
        let child = issue("I_11", 11, "Child");
        parent.sub_issue_hints = vec![hint(&child)];

        let h = Hierarchy::assemble(vec![parent, child]).unwrap();
        assert_eq!(h.get("I_11").unwrap().parent.as_ref().unwrap().id, "I_10");
    }

    #[test]
    fn test_explicit_parent_wins_over_listing() {
        let real = issue("I_1", 1, "Real");
        let mut lister = issue("I_2", 2, "Lister");
        let mut child = issue("I_3", 3, "Child");
        lister.sub_issue_hints = vec![hint(&child)];
        child.parent_hint = Some(hint(&real));

        let h = Hierarchy::assemble(vec![real, lister, child]).unwrap();
        assert_eq!(h.get("I_3").unwrap().parent.as_ref().unwrap().id, "I_1");
    }

    #[test]
    fn test_lookup_by_item_id_and_number() {
        let h = Hierarchy::assemble(vec![issue("I_1", 7, "Seven")]).unwrap();
        assert_eq!(h.get("PVTI_I_1").unwrap().id, "I_1");
        assert_eq!(h.find_by_number(7).len(), 1);
        assert!(h.find_by_number(8).is_empty());
    }

    #[test]
    fn test_sub_issues_hydration_marks_membership() {
        let mut parent = issue("I_10", 10, "Parent");
        let child = issue("I_11", 11, "Child");
        parent.sub_issue_hints = vec![
            hint(&child),
            TaskRef {
                id: "I_99".into(),
                title: "Not on board".into(),
                number: Some(99),
            },
        ];

        let h = Hierarchy::assemble(vec![parent, child]).unwrap();
        let detail = h.with_sub_issues("I_10").unwrap();
        assert_eq!(detail.sub_issues.len(), 2);
        assert!(detail.sub_issues[0].in_project);
        assert!(!detail.sub_issues[1].in_project);
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let mut task = issue("I_1", 1, "Loop");
        task.parent_hint = Some(hint(&task));
        let h = Hierarchy::assemble(vec![task]).unwrap();
        assert!(h.get("I_1").unwrap().parent.is_none());
    }
}
