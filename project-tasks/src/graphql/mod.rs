//! GraphQL transport
//!
//! This module provides a trait-based abstraction over the GraphQL endpoint
//! so the fetcher can be driven by the real HTTP client or by a stub in
//! tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProjectError, ProjectResult};

pub mod http;
pub mod queries;
pub mod types;

pub use http::HttpTransport;

/// Trait for GraphQL transports
///
/// Implementations return the `data` member of a successful response and
/// map every failure (HTTP status, GraphQL `errors[]`, network) onto
/// [`ProjectError`].
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Get the name of this transport
    fn name(&self) -> &str;

    /// Execute one query and return its `data` member
    async fn execute(&self, query: &str, variables: Value) -> ProjectResult<Value>;
}

/// Execute a query and decode `data` into `T`
pub async fn execute_typed<T: DeserializeOwned>(
    transport: &dyn GraphQlTransport,
    query: &str,
    variables: Value,
) -> ProjectResult<T> {
    let data = transport.execute(query, variables).await?;
    serde_json::from_value(data)
        .map_err(|e| ProjectError::transport(format!("unexpected response shape: {}", e)))
}
