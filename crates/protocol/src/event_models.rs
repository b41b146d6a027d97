//! Observability event models.
//!
//! Every component records what it did as an [`Event`] in the bounded
//! event log. The [`MetricsSummary`] is the read-only view the CLI
//! `metrics` command (and any HTTP layer) exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

/// The category of an observability event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An orchestrator workflow step or a single agent execution.
    AgentCall,

    /// A tool function ran against the task/goal store.
    ToolExecution,

    /// A message was sent or processed on the A2A bus.
    #[serde(rename = "a2a_communication")]
    A2ACommunication,

    /// Something failed.
    Error,

    /// A fresh agent session was created.
    SessionCreated,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 5] = [
        EventKind::AgentCall,
        EventKind::ToolExecution,
        EventKind::A2ACommunication,
        EventKind::Error,
        EventKind::SessionCreated,
    ];

    /// Wire name of the kind (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgentCall => "agent_call",
            Self::ToolExecution => "tool_execution",
            Self::A2ACommunication => "a2a_communication",
            Self::Error => "error",
            Self::SessionCreated => "session_created",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Event {
    /// Unique identifier assigned at creation.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Category of the event.
    pub kind: EventKind,

    /// UTC creation instant.
    pub timestamp: DateTime<Utc>,

    /// Agent or component that produced the event.
    pub source_name: String,

    /// Insertion-ordered event details. Most events carry an `action` key.
    #[ts(type = "Record<string, unknown>")]
    pub details: Map<String, Value>,

    /// Duration of the recorded operation in milliseconds.
    #[serde(default)]
    pub duration_ms: f64,
}

impl Event {
    /// The `action` detail, or `"unknown"` when absent.
    pub fn action(&self) -> &str {
        self.details
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}

/// Condensed view of an event used in the metrics summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct RecentEvent {
    pub event_type: EventKind,
    pub agent: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
}

impl From<&Event> for RecentEvent {
    fn from(event: &Event) -> Self {
        Self {
            event_type: event.kind,
            agent: event.source_name.clone(),
            timestamp: event.timestamp,
            action: event.action().to_string(),
        }
    }
}

/// Counts per event kind plus the most recent events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct MetricsSummary {
    pub total_events: usize,
    pub agent_calls: usize,
    pub tool_executions: usize,
    pub a2a_messages: usize,
    pub errors: usize,
    pub sessions_created: usize,

    /// Seconds since the event tracker was created.
    pub uptime_seconds: i64,

    /// Up to ten most recent events, oldest first.
    pub recent_events: Vec<RecentEvent>,
}
