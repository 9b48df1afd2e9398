//! HTTP transport for the GitHub GraphQL endpoint

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::{GraphQlError, GraphQlResponse};
use super::GraphQlTransport;
use crate::config::{Credential, FetchConfig, GitHubConfig};
use crate::error::{ProjectError, ProjectResult};

/// Longest slice of a response body quoted in an error message
const BODY_EXCERPT_LEN: usize = 200;

/// GraphQL transport over `reqwest`
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    credential: Credential,
}

impl HttpTransport {
    pub fn new(
        github: &GitHubConfig,
        fetch: &FetchConfig,
        credential: Credential,
    ) -> ProjectResult<Self> {
        let client = Client::builder()
            .user_agent(github.user_agent.clone())
            .timeout(fetch.request_timeout())
            .build()
            .map_err(|e| ProjectError::transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: github.api_url.clone(),
            credential,
        })
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    fn name(&self) -> &str {
        "github-graphql"
    }

    #[instrument(skip(self, query, variables), fields(endpoint = %self.endpoint))]
    async fn execute(&self, query: &str, variables: Value) -> ProjectResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "GraphQL request failed");
            return Err(status_error(status, &headers, &body));
        }

        let payload: GraphQlResponse = response.json().await?;
        if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
            warn!(count = errors.len(), "GraphQL response carried errors");
            return Err(graphql_error(&errors, &headers));
        }

        debug!("GraphQL request succeeded");
        payload
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| ProjectError::transport("response carried no data"))
    }
}

/// Map a non-2xx response onto the error taxonomy
fn status_error(status: StatusCode, headers: &HeaderMap, body: &str) -> ProjectError {
    let message = format!("HTTP {}: {}", status.as_u16(), excerpt(body));
    let (reset_at, retry_after) = rate_limit_hints(headers);

    match status {
        StatusCode::UNAUTHORIZED => ProjectError::Auth(message),
        StatusCode::FORBIDDEN => {
            let exhausted = header_u64(headers, "x-ratelimit-remaining") == Some(0);
            if exhausted || retry_after.is_some() {
                rate_limited(message, reset_at, retry_after)
            } else {
                ProjectError::Auth(message)
            }
        }
        StatusCode::NOT_FOUND => ProjectError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => rate_limited(message, reset_at, retry_after),
        _ => ProjectError::Transport(message),
    }
}

fn rate_limited(
    message: String,
    reset_at: Option<DateTime<Utc>>,
    retry_after: Option<Duration>,
) -> ProjectError {
    ProjectError::RateLimit {
        message,
        reset_at,
        retry_after,
    }
}

/// Reset time and retry delay advertised by the rate-limit headers
fn rate_limit_hints(headers: &HeaderMap) -> (Option<DateTime<Utc>>, Option<Duration>) {
    let reset_at = header_u64(headers, "x-ratelimit-reset")
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
    let retry_after = header_u64(headers, "retry-after").map(Duration::from_secs);
    (reset_at, retry_after)
}

/// Map GraphQL `errors[]` onto the error taxonomy, first classified entry wins
fn graphql_error(errors: &[GraphQlError], headers: &HeaderMap) -> ProjectError {
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    for error in errors {
        match error.kind.as_deref() {
            Some("NOT_FOUND") => return ProjectError::NotFound(message),
            Some("RATE_LIMITED") => {
                let (reset_at, retry_after) = rate_limit_hints(headers);
                return rate_limited(message, reset_at, retry_after);
            }
            Some("FORBIDDEN") | Some("INSUFFICIENT_SCOPES") => return ProjectError::Auth(message),
            _ => {}
        }
    }

    ProjectError::Transport(message)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(BODY_EXCERPT_LEN).collect();
    format!("{}...", cut)
}
