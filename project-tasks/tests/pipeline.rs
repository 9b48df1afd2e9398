//! End-to-end pipeline tests against a scripted transport

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use project_tasks::config::FetchConfig;
use project_tasks::graphql::GraphQlTransport;
use project_tasks::{ProjectError, ProjectResult, ProjectTasks, TaskFilter, TaskSelector, TaskType};

struct Scripted {
    pages: Mutex<VecDeque<Value>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(pages: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphQlTransport for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, _query: &str, _variables: Value) -> ProjectResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProjectError::Transport("script exhausted".into()))
    }
}

fn project() -> Value {
    json!({
        "organization": { "projectV2": {
            "id": "PVT_kw", "number": 3, "title": "Platform", "url": "https://github.com/orgs/acme/projects/3"
        } }
    })
}

fn page(nodes: Vec<Value>, next: Option<&str>) -> Value {
    json!({ "node": { "items": {
        "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
        "nodes": nodes
    } } })
}

fn issue(number: u64, parent: Option<u64>, status: &str, assignee: &str) -> Value {
    let mut content = json!({
        "__typename": "Issue",
        "id": format!("I_{}", number),
        "number": number,
        "title": format!("Issue {}", number),
        "body": "text",
        "state": "OPEN",
        "assignees": { "nodes": [{ "login": assignee }] },
        "labels": { "nodes": [] },
        "repository": { "name": "platform", "owner": { "login": "acme" } }
    });
    if let Some(p) = parent {
        content["parent"] = json!({ "id": format!("I_{}", p), "title": format!("Issue {}", p), "number": p });
    }
    json!({
        "id": format!("PVTI_{}", number),
        "type": "ISSUE",
        "content": content,
        "fieldValues": { "nodes": [
            { "__typename": "ProjectV2ItemFieldSingleSelectValue", "name": status, "field": { "name": "Status" } }
        ] }
    })
}

fn facade(transport: Arc<Scripted>) -> ProjectTasks {
    ProjectTasks::new(transport, FetchConfig::default())
}

#[tokio::test]
async fn test_three_issues_one_child() {
    let transport = Scripted::new(vec![
        project(),
        page(
            vec![
                issue(10, None, "Todo", "alice"),
                issue(11, Some(10), "Done", "bob"),
                issue(12, None, "Todo", "alice"),
            ],
            None,
        ),
    ]);
    let list = facade(transport)
        .list_tasks("acme", 3, &TaskFilter::default(), false)
        .await
        .unwrap();

    assert_eq!(list.total_count, 3);
    assert_eq!(list.tasks.len(), 3);
    let child = list.tasks.iter().find(|t| t.number == Some(11)).unwrap();
    assert_eq!(child.parent.as_ref().unwrap().number, Some(10));
    assert!(list.tasks.iter().all(|t| t.task_type == TaskType::Issue));
}

#[tokio::test]
async fn test_children_filtered_by_status() {
    let transport = Scripted::new(vec![
        project(),
        page(
            vec![
                issue(10, None, "In Progress", "alice"),
                issue(11, Some(10), "Done", "bob"),
                issue(12, Some(10), "Todo", "bob"),
            ],
            None,
        ),
    ]);
    let filter = TaskFilter::default().with_status(Some("Done".into()));
    let children = facade(transport)
        .get_children("acme", 3, &TaskSelector::Number(10), &filter)
        .await
        .unwrap();

    assert_eq!(children.total_children, 1);
    assert_eq!(children.unfiltered_children, 2);
    assert_eq!(children.child_tasks[0].number, Some(11));
    assert_eq!(children.filters_applied["status"], "Done");
}

#[tokio::test]
async fn test_items_across_pages_keep_order() {
    let transport = Scripted::new(vec![
        project(),
        page(vec![issue(1, None, "Todo", "a"), issue(2, Some(1), "Todo", "a")], Some("Y3Vyc29yOjI=")),
        page(vec![issue(3, Some(1), "Todo", "a")], None),
    ]);
    let children = facade(transport.clone())
        .get_children("acme", 3, &TaskSelector::Id("I_1".into()), &TaskFilter::default())
        .await
        .unwrap();

    let numbers: Vec<_> = children.child_tasks.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![Some(2), Some(3)]);
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn test_repeated_cursor_aborts_whole_call() {
    let transport = Scripted::new(vec![
        project(),
        page(vec![issue(1, None, "Todo", "a")], Some("abc")),
        page(vec![issue(2, None, "Todo", "a")], Some("abc")),
    ]);
    let err = facade(transport)
        .list_tasks("acme", 3, &TaskFilter::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Transport(_)));
}

#[tokio::test]
async fn test_filter_is_idempotent_over_results() {
    let transport = Scripted::new(vec![
        project(),
        page(
            vec![
                issue(1, None, "Todo", "alice"),
                issue(2, None, "Done", "alice"),
                issue(3, None, "Todo", "bob"),
            ],
            None,
        ),
    ]);
    let filter = TaskFilter::default()
        .with_status(Some("todo".into()))
        .with_assignee(Some("alice".into()));
    let list = facade(transport)
        .list_tasks("acme", 3, &filter, false)
        .await
        .unwrap();

    let again = filter.apply(&list.tasks);
    assert_eq!(again.len(), list.tasks.len());
    assert_eq!(list.matched_count, 1);
    assert_eq!(list.total_count, 3);
}

#[tokio::test]
async fn test_malformed_item_fails_without_partial_result() {
    let transport = Scripted::new(vec![
        project(),
        page(
            vec![
                issue(1, None, "Todo", "a"),
                json!({ "id": "PVTI_bad", "type": "ISSUE", "content": null }),
            ],
            None,
        ),
    ]);
    let err = facade(transport)
        .list_tasks("acme", 3, &TaskFilter::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Normalization(_)));
}

#[tokio::test]
async fn test_selector_errors_precede_network() {
    let transport = Scripted::new(vec![]);
    let _facade = facade(transport.clone());

    let err = TaskSelector::from_options(None, None).unwrap_err();
    assert!(matches!(err, ProjectError::Usage(_)));
    assert_eq!(transport.calls(), 0);
}
