//! File-backed task and goal store.
//!
//! - [`TaskStore`]: whole-file JSON CRUD with dedup and sorting
//! - [`TaskTools`]: the tool boundary agents call, producing [`ToolResult`]
//!   envelopes and observability events
//!
//! [`ToolResult`]: st_protocol::ToolResult

pub mod error;
pub mod file_store;
pub mod tools;

pub use error::{StoreError, StoreResult};
pub use file_store::{AddOutcome, NewTask, StatusFilter, TaskStore, TaskUpdate};
pub use tools::{TaskTools, TOOL_NAMES};
