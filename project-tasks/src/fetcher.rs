//! Page fetcher
//!
//! Resolves a project by organization and number, then walks its item
//! connection one page at a time until the source reports no next page.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::config::FetchConfig;
use crate::error::{ProjectError, ProjectResult};
use crate::graphql::queries::{ITEMS_QUERY, PROJECT_QUERY};
use crate::graphql::types::{ItemsQueryData, ProjectQueryData, RawItem};
use crate::graphql::{execute_typed, GraphQlTransport};
use crate::types::ProjectMeta;

/// Sequential cursor-following fetcher
pub struct PageFetcher {
    transport: Arc<dyn GraphQlTransport>,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn GraphQlTransport>, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    /// Resolve project metadata
    #[instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn fetch_project(&self, org: &str, number: u64) -> ProjectResult<ProjectMeta> {
        let data: ProjectQueryData = execute_typed(
            self.transport.as_ref(),
            PROJECT_QUERY,
            json!({ "org": org, "projectNumber": number }),
        )
        .await?;

        let organization = data
            .organization
            .ok_or_else(|| ProjectError::NotFound(format!("organization '{}'", org)))?;
        let project = organization.project_v2.ok_or_else(|| {
            ProjectError::NotFound(format!("project {} in organization '{}'", number, org))
        })?;

        Ok(project.into())
    }

    /// Fetch every item of a resolved project.
    ///
    /// Redacted items are dropped. Protocol violations (repeated cursor,
    /// missing cursor, runaway pagination) abort the whole fetch.
    #[instrument(skip(self, project), fields(project = %project.id))]
    pub async fn fetch_items(&self, project: &ProjectMeta) -> ProjectResult<Vec<RawItem>> {
        let page_size = self.config.effective_page_size();
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;
        let mut redacted = 0usize;

        loop {
            if pages >= self.config.max_pages {
                return Err(ProjectError::transport(format!(
                    "pagination exceeded {} pages",
                    self.config.max_pages
                )));
            }

            let data: ItemsQueryData = execute_typed(
                self.transport.as_ref(),
                ITEMS_QUERY,
                json!({ "projectId": project.id, "first": page_size, "after": cursor }),
            )
            .await?;
            pages += 1;

            let page = data.node.and_then(|node| node.items).ok_or_else(|| {
                ProjectError::transport(format!("node {} is not a project", project.id))
            })?;

            let before = items.len();
            for item in page.nodes.into_iter().flatten() {
                if item.is_redacted() {
                    warn!(item = item.id.as_deref().unwrap_or("?"), "skipping redacted item");
                    redacted += 1;
                    continue;
                }
                items.push(item);
            }
            debug!(page = pages, received = items.len() - before, "fetched page");

            if !page.page_info.has_next_page {
                break;
            }

            let next = page.page_info.end_cursor.ok_or_else(|| {
                ProjectError::transport("page reported more items but no end cursor")
            })?;
            if cursor.as_deref() == Some(next.as_str()) {
                return Err(ProjectError::transport(format!(
                    "cursor did not advance after page {}",
                    pages
                )));
            }
            cursor = Some(next);
        }

        if redacted > 0 {
            warn!(redacted, "items without read access were skipped");
        }
        info!(pages, items = items.len(), "fetched project items");
        Ok(items)
    }

    /// Resolve a project and fetch all of its items
    pub async fn fetch_all_items(
        &self,
        org: &str,
        number: u64,
    ) -> ProjectResult<(ProjectMeta, Vec<RawItem>)> {
        let project = self.fetch_project(org, number).await?;
        let items = self.fetch_items(&project).await?;
        Ok((project, items))
    }
}


#[cfg(test)]
mod tests {
    use super::stub::*;
    use super::*;
    use serde_json::json;

    fn fetcher(transport: Arc<ScriptedTransport>, config: FetchConfig) -> PageFetcher {
        PageFetcher::new(transport, config)
    }

    fn meta() -> ProjectMeta {
        ProjectMeta {
            id: "PVT_1".into(),
            number: 5,
            title: "Roadmap".into(),
            description: None,
            url: String::new(),
            public: false,
            closed: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_follows_cursor_across_pages() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(items_page(vec![draft(1), draft(2)], Some("c1"))),
            Ok(items_page(vec![draft(3)], Some("c2"))),
            Ok(items_page(vec![draft(4)], None)),
        ]));
        let items = fetcher(transport.clone(), FetchConfig::default())
            .fetch_items(&meta())
            .await
            .unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(transport.call_count(), 3);

        let vars = transport.variables.lock().unwrap();
        assert!(vars[0]["after"].is_null());
        assert_eq!(vars[1]["after"], "c1");
        assert_eq!(vars[2]["after"], "c2");
        assert_eq!(vars[0]["first"], 100);
    }

    #[tokio::test]
    async fn test_empty_project_is_valid() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(items_page(vec![], None))]));
        let items = fetcher(transport.clone(), FetchConfig::default())
            .fetch_items(&meta())
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_transport_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(items_page(vec![draft(1)], Some("same"))),
            Ok(items_page(vec![draft(2)], Some("same"))),
            Ok(items_page(vec![draft(3)], None)),
        ]));
        let err = fetcher(transport.clone(), FetchConfig::default())
            .fetch_items(&meta())
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectError::Transport(_)));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_cursor_is_transport_error() {
        let page = json!({
            "node": { "items": { "pageInfo": { "hasNextPage": true, "endCursor": null }, "nodes": [] } }
        });
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(page)]));
        let err = fetcher(transport, FetchConfig::default())
            .fetch_items(&meta())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Transport(_)));
    }

    #[tokio::test]
    async fn test_max_pages_guard() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(items_page(vec![draft(1)], Some("a"))),
            Ok(items_page(vec![draft(2)], Some("b"))),
            Ok(items_page(vec![draft(3)], Some("c"))),
        ]));
        let config = FetchConfig {
            max_pages: 2,
            ..Default::default()
        };
        let err = fetcher(transport.clone(), config)
            .fetch_items(&meta())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Transport(ref m) if m.contains("2 pages")));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_redacted_items_are_skipped() {
        let redacted = json!({ "id": "PVTI_x", "type": "REDACTED", "content": null });
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(items_page(
            vec![draft(1), redacted, json!(null)],
            None,
        ))]));
        let items = fetcher(transport, FetchConfig::default())
            .fetch_items(&meta())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_project_is_not_found() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(
            json!({ "organization": { "projectV2": null } }),
        )]));
        let err = fetcher(transport, FetchConfig::default())
            .fetch_project("acme", 99)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::NotFound(ref m) if m.contains("99")));
    }

    #[tokio::test]
    async fn test_fetch_all_items_resolves_project_first() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(project_page()),
            Ok(items_page(vec![draft(1)], None)),
        ]));
        let (project, items) = fetcher(transport.clone(), FetchConfig::default())
            .fetch_all_items("acme", 5)
            .await
            .unwrap();

        assert_eq!(project.title, "Roadmap");
        assert!(project.description.is_none());
        assert_eq!(items.len(), 1);
        assert_eq!(transport.variables.lock().unwrap()[1]["projectId"], "PVT_1");
    }
}
