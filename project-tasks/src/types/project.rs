//! Project metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graphql::types::RawProject;

/// Board metadata resolved from `organization.projectV2(number)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Project node id, used to page through items
    pub id: String,
    pub number: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub public: bool,
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawProject> for ProjectMeta {
    fn from(raw: RawProject) -> Self {
        Self {
            id: raw.id,
            number: raw.number,
            title: raw.title,
            description: raw.short_description.filter(|d| !d.trim().is_empty()),
            url: raw.url,
            public: raw.public,
            closed: raw.closed,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}
