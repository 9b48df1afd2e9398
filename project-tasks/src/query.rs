//! Query facade
//!
//! [`ProjectTasks`] is the single entry point shared by the CLI and the
//! tool server. Each call runs fetch, normalize, assemble and filter from
//! scratch; nothing is cached between calls.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{Config, Credential, FetchConfig};
use crate::error::{ProjectError, ProjectResult};
use crate::fetcher::PageFetcher;
use crate::filter::TaskFilter;
use crate::graphql::{GraphQlTransport, HttpTransport};
use crate::hierarchy::Hierarchy;
use crate::normalize::normalize_all;
use crate::types::{ProjectMeta, Task};

/// How a caller names a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSelector {
    /// Content id or project item id
    Id(String),
    /// Issue or pull request number
    Number(u64),
}

impl TaskSelector {
    /// Build a selector from the two optional inputs; exactly one must be set
    pub fn from_options(task_id: Option<String>, task_number: Option<u64>) -> ProjectResult<Self> {
        let task_id = task_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
        match (task_id, task_number) {
            (Some(id), None) => Ok(TaskSelector::Id(id)),
            (None, Some(number)) => Ok(TaskSelector::Number(number)),
            (Some(_), Some(_)) => Err(ProjectError::usage(
                "provide either task_id or task_number, not both",
            )),
            (None, None) => Err(ProjectError::usage(
                "either task_id or task_number is required",
            )),
        }
    }
}

impl fmt::Display for TaskSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSelector::Id(id) => write!(f, "task {}", id),
            TaskSelector::Number(n) => write!(f, "task #{}", n),
        }
    }
}

/// Result of [`ProjectTasks::list_tasks`]
#[derive(Debug, Clone, Serialize)]
pub struct TaskList {
    pub project: ProjectMeta,
    /// Tasks fetched before filtering
    pub total_count: usize,
    pub matched_count: usize,
    pub filters_applied: BTreeMap<String, String>,
    pub tasks: Vec<Task>,
}

/// Result of [`ProjectTasks::get_children`]
#[derive(Debug, Clone, Serialize)]
pub struct ChildTasks {
    pub project: ProjectMeta,
    pub parent_task: Task,
    /// Children left after filtering
    pub total_children: usize,
    pub unfiltered_children: usize,
    pub filters_applied: BTreeMap<String, String>,
    pub child_tasks: Vec<Task>,
}

/// Result of [`ProjectTasks::get_task_detail`]
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub project: ProjectMeta,
    pub task: Task,
}

/// List / Children / Detail over one project board
pub struct ProjectTasks {
    fetcher: PageFetcher,
}

impl ProjectTasks {
    pub fn new(transport: Arc<dyn GraphQlTransport>, fetch: FetchConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(transport, fetch),
        }
    }

    /// Resolve the credential and build an HTTP-backed facade.
    ///
    /// Fails with a usage error before any request when no token resolves.
    pub fn connect(config: &Config, token: Option<String>) -> ProjectResult<Self> {
        let credential = Credential::resolve(token, &config.github.token_env)?;
        let transport = HttpTransport::new(&config.github, &config.fetch, credential)?;
        Ok(Self::new(Arc::new(transport), config.fetch.clone()))
    }

    async fn load(&self, org: &str, project_number: u64) -> ProjectResult<(ProjectMeta, Hierarchy)> {
        let org = org.trim();
        if org.is_empty() {
            return Err(ProjectError::usage("organization must not be empty"));
        }

        let (project, items) = self.fetcher.fetch_all_items(org, project_number).await?;
        let tasks = normalize_all(items)?;
        let hierarchy = Hierarchy::assemble(tasks)?;
        Ok((project, hierarchy))
    }

    /// All tasks of a board, optionally filtered
    #[instrument(skip(self, filter))]
    pub async fn list_tasks(
        &self,
        org: &str,
        project_number: u64,
        filter: &TaskFilter,
        include_body: bool,
    ) -> ProjectResult<TaskList> {
        let (project, hierarchy) = self.load(org, project_number).await?;
        let total_count = hierarchy.len();

        let tasks: Vec<Task> = filter
            .apply(hierarchy.tasks())
            .into_iter()
            .cloned()
            .map(|t| if include_body { t } else { t.without_body() })
            .collect();

        info!(total_count, matched = tasks.len(), "listed tasks");
        Ok(TaskList {
            project,
            total_count,
            matched_count: tasks.len(),
            filters_applied: filter.applied(),
            tasks,
        })
    }

    /// Direct children of one task, optionally filtered
    #[instrument(skip(self, filter))]
    pub async fn get_children(
        &self,
        org: &str,
        project_number: u64,
        selector: &TaskSelector,
        filter: &TaskFilter,
    ) -> ProjectResult<ChildTasks> {
        let (project, hierarchy) = self.load(org, project_number).await?;
        let parent = resolve(&hierarchy, selector)?;

        let children = hierarchy.children_of(&parent.id);
        let unfiltered_children = children.len();
        let child_tasks: Vec<Task> = filter
            .apply(children)
            .into_iter()
            .map(|t| t.clone().without_body())
            .collect();

        info!(parent = %parent.id, total = child_tasks.len(), unfiltered_children, "listed children");
        Ok(ChildTasks {
            parent_task: parent.clone().without_body(),
            total_children: child_tasks.len(),
            unfiltered_children,
            filters_applied: filter.applied(),
            child_tasks,
            project,
        })
    }

    /// One task with body and sub-issues
    #[instrument(skip(self))]
    pub async fn get_task_detail(
        &self,
        org: &str,
        project_number: u64,
        selector: &TaskSelector,
    ) -> ProjectResult<TaskDetail> {
        let (project, hierarchy) = self.load(org, project_number).await?;
        let id = resolve(&hierarchy, selector)?.id.clone();
        let task = hierarchy
            .with_sub_issues(&id)
            .ok_or_else(|| ProjectError::NotFound(selector.to_string()))?;

        Ok(TaskDetail { project, task })
    }
}

fn resolve<'a>(hierarchy: &'a Hierarchy, selector: &TaskSelector) -> ProjectResult<&'a Task> {
    match selector {
        TaskSelector::Id(id) => hierarchy
            .get(id)
            .ok_or_else(|| ProjectError::NotFound(format!("{} is not in this project", selector))),
        TaskSelector::Number(number) => {
            let matches = hierarchy.find_by_number(*number);
            match matches.as_slice() {
                [] => Err(ProjectError::NotFound(format!(
                    "{} is not in this project",
                    selector
                ))),
                [task] => Ok(*task),
                many => {
                    let repos: Vec<&str> = many
                        .iter()
                        .filter_map(|t| t.repository.as_deref())
                        .collect();
                    Err(ProjectError::usage(format!(
                        "task #{} exists in several repositories ({}); use task_id instead",
                        number,
                        repos.join(", ")
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::stub::{items_page, project_page, ScriptedTransport};
    use serde_json::{json, Value};

    fn issue(n: u64, parent: Option<u64>, status: &str, repo: &str) -> Value {
        let mut content = json!({
            "__typename": "Issue",
            "id": format!("I_{}_{}", repo, n),
            "number": n,
            "title": format!("Issue {}", n),
            "body": format!("Body {}", n),
            "state": "OPEN",
            "repository": { "name": repo, "owner": { "login": "acme" } }
        });
        if let Some(p) = parent {
            content["parent"] = json!({ "id": format!("I_{}_{}", repo, p), "title": format!("Issue {}", p), "number": p });
        }
        json!({
            "id": format!("PVTI_{}_{}", repo, n),
            "type": "ISSUE",
            "content": content,
            "fieldValues": { "nodes": [
                { "__typename": "ProjectV2ItemFieldSingleSelectValue", "name": status, "field": { "name": "Status" } }
            ] }
        })
    }

    fn facade(items: Vec<Value>) -> (ProjectTasks, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(project_page()),
            Ok(items_page(items, None)),
        ]));
        (
            ProjectTasks::new(transport.clone(), FetchConfig::default()),
            transport,
        )
    }

    #[test]
    fn test_selector_requires_exactly_one() {
        assert!(matches!(
            TaskSelector::from_options(None, None),
            Err(ProjectError::Usage(_))
        ));
        assert!(matches!(
            TaskSelector::from_options(Some("I_1".into()), Some(1)),
            Err(ProjectError::Usage(_))
        ));
        assert_eq!(
            TaskSelector::from_options(Some(" ".into()), Some(3)).unwrap(),
            TaskSelector::Number(3)
        );
    }

    #[tokio::test]
    async fn test_list_strips_bodies_and_counts_before_filter() {
        let (tasks, _) = facade(vec![
            issue(1, None, "Todo", "app"),
            issue(2, Some(1), "Done", "app"),
        ]);
        let filter = TaskFilter::default().with_status(Some("done".into()));
        let list = tasks.list_tasks("acme", 5, &filter, false).await.unwrap();

        assert_eq!(list.total_count, 2);
        assert_eq!(list.matched_count, 1);
        assert!(list.tasks[0].body.is_none());
        assert_eq!(list.filters_applied["status"], "done");
    }

    #[tokio::test]
    async fn test_list_with_bodies() {
        let (tasks, _) = facade(vec![issue(1, None, "Todo", "app")]);
        let list = tasks
            .list_tasks("acme", 5, &TaskFilter::default(), true)
            .await
            .unwrap();
        assert_eq!(list.tasks[0].body.as_deref(), Some("Body 1"));
    }

    #[tokio::test]
    async fn test_empty_org_fails_before_fetch() {
        let (tasks, transport) = facade(vec![]);
        let err = tasks
            .list_tasks("  ", 5, &TaskFilter::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Usage(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_children_by_item_id() {
        let (tasks, _) = facade(vec![
            issue(1, None, "Todo", "app"),
            issue(2, Some(1), "Done", "app"),
            issue(3, Some(1), "Todo", "app"),
        ]);
        let selector = TaskSelector::Id("PVTI_app_1".into());
        let children = tasks
            .get_children("acme", 5, &selector, &TaskFilter::default())
            .await
            .unwrap();

        assert_eq!(children.parent_task.id, "I_app_1");
        assert_eq!(children.total_children, 2);
        assert_eq!(children.unfiltered_children, 2);
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let (tasks, _) = facade(vec![issue(1, None, "Todo", "app")]);
        let err = tasks
            .get_children("acme", 5, &TaskSelector::Number(42), &TaskFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_number_shared_across_repositories_is_ambiguous() {
        let (tasks, _) = facade(vec![issue(1, None, "Todo", "app"), issue(1, None, "Todo", "api")]);
        let err = tasks
            .get_task_detail("acme", 5, &TaskSelector::Number(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Usage(ref m) if m.contains("acme/api")));
    }

    #[tokio::test]
    async fn test_detail_hydrates_sub_issues() {
        let (tasks, _) = facade(vec![
            issue(1, None, "Todo", "app"),
            issue(2, Some(1), "Done", "app"),
        ]);
        let detail = tasks
            .get_task_detail("acme", 5, &TaskSelector::Number(1))
            .await
            .unwrap();

        assert_eq!(detail.project.title, "Roadmap");
        assert_eq!(detail.task.body.as_deref(), Some("Body 1"));
        assert_eq!(detail.task.sub_issues.len(), 1);
        assert!(detail.task.sub_issues[0].in_project);
    }
}
