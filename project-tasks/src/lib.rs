//! Project Tasks
//!
//! Retrieves issues, pull requests and draft issues from a GitHub Projects
//! (v2) board, rebuilds their parent/sub-issue hierarchy and filters them.
//!
//! # Pipeline
//!
//! - [`graphql`] - transport trait plus the HTTP implementation
//! - [`fetcher`] - cursor-following page fetcher
//! - [`normalize`] - raw item to [`Task`]
//! - [`hierarchy`] - id index and parent resolution
//! - [`filter`] - ANDed predicates
//! - [`query`] - List / Children / Detail facade
//!
//! Rendering for the CLI lives in [`render`].

pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod graphql;
pub mod hierarchy;
pub mod logging;
pub mod normalize;
pub mod query;
pub mod render;
pub mod types;

pub use config::{Config, Credential};
pub use error::{ProjectError, ProjectResult};
pub use filter::TaskFilter;
pub use query::{ChildTasks, ProjectTasks, TaskDetail, TaskList, TaskSelector};
pub use types::{ProjectMeta, Task, TaskState, TaskType};
