//! Raw response types
//!
//! These structs mirror the JSON returned for the queries in
//! [`super::queries`]. Almost everything is optional: content is a union,
//! and any field may come back null when the token cannot see it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GraphQL connection with a nullable node list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Connection<T> {
    /// Non-null nodes in source order
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

/// Cursor block returned with every page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

// ============================================================================
// Project lookup
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProjectQueryData {
    pub organization: Option<OrganizationNode>,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationNode {
    #[serde(rename = "projectV2")]
    pub project_v2: Option<RawProject>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    pub id: String,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Item pages
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ItemsQueryData {
    pub node: Option<ProjectItemsNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectItemsNode {
    pub items: Option<ItemPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<Option<RawItem>>,
}

/// One project item as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// Project item node id
    #[serde(default)]
    pub id: Option<String>,
    /// Kind discriminator (`ISSUE`, `PULL_REQUEST`, `DRAFT_ISSUE`, `REDACTED`)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub content: Option<RawContent>,
    #[serde(default)]
    pub field_values: Option<Connection<Value>>,
}

impl RawItem {
    pub fn is_redacted(&self) -> bool {
        self.kind.as_deref() == Some("REDACTED")
    }
}

/// Issue, pull request or draft issue content (flattened union)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<Actor>,
    #[serde(default)]
    pub creator: Option<Actor>,
    #[serde(default)]
    pub assignees: Option<Connection<Actor>>,
    #[serde(default)]
    pub labels: Option<Connection<RawLabel>>,
    #[serde(default)]
    pub repository: Option<RawRepository>,
    #[serde(default)]
    pub parent: Option<RawIssueRef>,
    #[serde(default)]
    pub sub_issues: Option<Connection<RawIssueRef>>,
    #[serde(default)]
    pub sub_issues_summary: Option<RawSubIssuesSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRepository {
    pub name: String,
    #[serde(default)]
    pub owner: Option<Actor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssueRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubIssuesSummary {
    pub total: u32,
    pub completed: u32,
    #[serde(default)]
    pub percent_completed: u32,
}

// ============================================================================
// Response envelope
// ============================================================================

/// Top-level GraphQL response
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// One entry of `errors[]`
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    /// GitHub-specific classification (`NOT_FOUND`, `RATE_LIMITED`, ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_page_tolerates_null_nodes() {
        let page: ItemPage = serde_json::from_value(json!({
            "pageInfo": { "hasNextPage": false, "endCursor": null },
            "nodes": [null, { "id": "PVTI_1", "type": "DRAFT_ISSUE", "content": { "id": "DI_1" } }]
        }))
        .unwrap();

        assert!(!page.page_info.has_next_page);
        assert_eq!(page.nodes.into_iter().flatten().count(), 1);
    }

    #[test]
    fn test_redacted_item() {
        let item: RawItem =
            serde_json::from_value(json!({ "id": "PVTI_9", "type": "REDACTED", "content": null }))
                .unwrap();
        assert!(item.is_redacted());
        assert!(item.content.is_none());
    }
}
