//! # st-protocol
//!
//! Core protocol definitions and data models for smarttask.
//!
//! This crate defines all shared data structures used for:
//! - Observability events and the metrics summary
//! - Agent-to-agent (A2A) messages exchanged over the message bus
//! - Task and goal records persisted by the store
//! - The tool-result envelope returned by every agent-facing tool
//! - Configuration file parsing (TOML config, Markdown agents, YAML routing)
//!
//! ## Modules
//!
//! - [`event_models`]: Event log records and metrics summary
//! - [`message_models`]: A2A message wire shape
//! - [`task_models`]: Tasks, subtasks, goals and the database file
//! - [`tool_models`]: Tool-result envelope
//! - [`agent_models`]: Agent definitions
//! - [`config_models`]: Global configuration from config.toml
//! - [`routing_models`]: Keyword routing rules from routing.yaml
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, serde_json, ts-rs, chrono and uuid
//! - TypeScript generation: Client-facing types derive `TS`
//! - Independent compilation: No dependencies on other smarttask crates

pub mod agent_models;
pub mod config_models;
pub mod event_models;
pub mod message_models;
pub mod routing_models;
pub mod task_models;
pub mod tool_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use config_models::*;
pub use event_models::*;
pub use message_models::*;
pub use routing_models::*;
pub use task_models::*;
pub use tool_models::*;

use serde_json::{Map, Value};

/// Convert a JSON value into an object map.
///
/// Objects are returned as-is; any other value is wrapped as `{"value": v}`.
/// `Null` becomes an empty map.
pub fn json_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}
