//! Tool-result envelope.
//!
//! Every agent-facing tool returns a [`ToolResult`], a JSON object tagged by
//! a mandatory `status` field:
//!
//! ```json
//! {"status": "success", "task": {...}, "message": "task_created:3"}
//! {"status": "duplicate", "task": {...}, "message": "task_exists:1"}
//! {"status": "error", "kind": "not_found", "message": "Task 9 not found."}
//! ```

use serde::{Deserialize, Serialize};

use crate::task_models::{Goal, Task};

/// Category of a tool failure.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    Validation,
    NotFound,
    Persistence,
}

/// Operation-specific payload of a successful tool call.
///
/// Untagged: the payload keys sit next to `status` in the envelope. Variant
/// order matters for deserialization, the catch-all `Message` comes last.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ToolPayload {
    Task {
        task: Task,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Tasks {
        tasks: Vec<Task>,
    },
    Goal {
        goal: Goal,
    },
    Goals {
        goals: Vec<Goal>,
    },
    Deleted {
        deleted_count: usize,
        deleted_tasks: Vec<Task>,
    },
    Time {
        timezone: String,
        time_utc: String,
    },
    Message {
        message: String,
    },
}

/// Result envelope returned by every tool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success(ToolPayload),
    Duplicate { task: Task, message: String },
    Error { kind: ToolErrorKind, message: String },
}

impl ToolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Wire value of the `status` tag.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Duplicate { .. } => "duplicate",
            Self::Error { .. } => "error",
        }
    }

    /// The single task carried by a success or duplicate result.
    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Success(ToolPayload::Task { task, .. }) | Self::Duplicate { task, .. } => {
                Some(task)
            }
            _ => None,
        }
    }

    /// The task list carried by a success result.
    pub fn tasks(&self) -> Option<&[Task]> {
        match self {
            Self::Success(ToolPayload::Tasks { tasks }) => Some(tasks),
            Self::Success(ToolPayload::Deleted { deleted_tasks, .. }) => Some(deleted_tasks),
            _ => None,
        }
    }

    pub fn goals(&self) -> Option<&[Goal]> {
        match self {
            Self::Success(ToolPayload::Goals { goals }) => Some(goals),
            _ => None,
        }
    }

    /// Human-readable message, when the envelope has one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(ToolPayload::Task { message, .. }) => message.as_deref(),
            Self::Success(ToolPayload::Message { message }) => Some(message),
            Self::Duplicate { message, .. } | Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
