//! Domain types shared by the pipeline, renderers and tool server

pub mod project;
pub mod task;

pub use project::ProjectMeta;
pub use task::{
    FieldValue, Label, SubIssueRef, SubIssuesSummary, Task, TaskRef, TaskState, TaskType,
    STATUS_FIELD,
};
