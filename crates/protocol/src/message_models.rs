//! Agent-to-agent (A2A) message wire shape.
//!
//! Messages are exchanged in-process over the message bus. They serialize
//! to a flat JSON object so they can be inspected or persisted by callers,
//! but the bus itself never serializes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;
use uuid::Uuid;

use crate::json_object;

/// A typed, asynchronous payload sent from one named agent to another.
///
/// # Example
///
/// ```
/// use st_protocol::A2AMessage;
/// use serde_json::json;
///
/// let message = A2AMessage::new(
///     "goal_planning_agent",
///     "task_manager_agent",
///     "decompose_goal",
///     json!({"goal": "Learn Rust", "horizon_months": 3}),
/// );
/// assert_eq!(message.content_str("goal"), Some("Learn Rust"));
/// assert!(!message.delivered);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct A2AMessage {
    #[ts(type = "string")]
    pub message_id: Uuid,
    pub from_agent: String,
    pub to_agent: String,

    /// Application-defined tag, e.g. `decompose_goal`.
    pub message_type: String,

    #[ts(type = "Record<string, unknown>")]
    pub content: Map<String, Value>,

    /// Optional side-channel data.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub context: Map<String, Value>,

    pub timestamp: DateTime<Utc>,

    /// Set once, when the recipient's handler completes without error.
    #[serde(default)]
    pub delivered: bool,
}

impl A2AMessage {
    /// Create a new undelivered message with an empty context.
    pub fn new(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        message_type: impl Into<String>,
        content: Value,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            message_type: message_type.into(),
            content: json_object(content),
            context: Map::new(),
            timestamp: Utc::now(),
            delivered: false,
        }
    }

    /// Attach side-channel context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = json_object(context);
        self
    }

    /// Look up a string field in the content.
    pub fn content_str(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }

    /// Look up an unsigned integer field in the content.
    pub fn content_u64(&self, key: &str) -> Option<u64> {
        self.content.get(key).and_then(Value::as_u64)
    }
}
