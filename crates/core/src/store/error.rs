//! Error types for the task store.

use st_protocol::ToolErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by [`TaskStore`](super::TaskStore) operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bad input, e.g. a status outside `pending | in_progress | done`.
    #[error("{0}")]
    Validation(String),

    /// Unknown task id or out-of-range subtask index.
    #[error("{0}")]
    NotFound(String),

    /// The database file could not be read, parsed or written.
    #[error("Database error at {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn task_not_found(id: u64) -> Self {
        Self::NotFound(format!("Task {id} not found."))
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Envelope category for this error.
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Self::Validation(_) => ToolErrorKind::Validation,
            Self::NotFound(_) => ToolErrorKind::NotFound,
            Self::Persistence { .. } => ToolErrorKind::Persistence,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
