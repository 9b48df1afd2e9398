//! Error types for the retrieval pipeline
//!
//! Every stage (transport, fetcher, normalizer, assembler, facade) reports
//! failures through [`ProjectError`]. The facade never swallows or rewraps
//! them, so callers can decide on presentation and retry policy.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while querying a project board
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Conflicting or missing inputs, detected before any network call
    #[error("usage error: {0}")]
    Usage(String),

    /// The credential was rejected or lacks the required scopes
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Organization, project or task does not resolve
    #[error("not found: {0}")]
    NotFound(String),

    /// The API throttled the request
    #[error("rate limit exceeded: {message}")]
    RateLimit {
        /// Message reported by the API
        message: String,
        /// When the primary rate limit window resets
        reset_at: Option<DateTime<Utc>>,
        /// How long the API asked us to wait
        retry_after: Option<Duration>,
    },

    /// Network failure, timeout or protocol violation
    #[error("transport error: {0}")]
    Transport(String),

    /// A raw record did not carry the information every task needs
    #[error("malformed project item: {0}")]
    Normalization(String),
}

impl ProjectError {
    /// Stable snake-case name used in structured error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectError::Usage(_) => "usage_error",
            ProjectError::Auth(_) => "auth_error",
            ProjectError::NotFound(_) => "not_found",
            ProjectError::RateLimit { .. } => "rate_limited",
            ProjectError::Transport(_) => "transport_error",
            ProjectError::Normalization(_) => "normalization_error",
        }
    }

    /// Whether a caller could reasonably try the same call again later.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProjectError::RateLimit { .. } | ProjectError::Transport(_)
        )
    }

    pub(crate) fn usage(message: impl Into<String>) -> Self {
        ProjectError::Usage(message.into())
    }

    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ProjectError::Transport(message.into())
    }

    pub(crate) fn normalization(message: impl Into<String>) -> Self {
        ProjectError::Normalization(message.into())
    }
}

impl From<reqwest::Error> for ProjectError {
    fn from(e: reqwest::Error) -> Self {
        // Strip the URL so query strings never leak into messages
        let e = e.without_url();
        if e.is_timeout() {
            ProjectError::Transport(format!("request timed out: {}", e))
        } else {
            ProjectError::Transport(e.to_string())
        }
    }
}

/// Result type alias for pipeline operations
pub type ProjectResult<T> = Result<T, ProjectError>;
