//! Global configuration models for `.smarttask/config.toml`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Represents global settings from `.smarttask/config.toml`.
///
/// Every field has a default, so an empty file is valid.
///
/// # Example
///
/// ```toml
/// data_file = "tasks_db.json"
/// event_capacity = 1000
///
/// [bus]
/// poll_interval_ms = 1000
/// queue_capacity = 1024
/// overflow = "block"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GlobalConfig {
    /// Path of the JSON task/goal database, relative to the project root.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Maximum number of events retained by the event tracker.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    #[serde(default)]
    pub bus: BusConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            event_capacity: default_event_capacity(),
            bus: BusConfig::default(),
        }
    }
}

/// Message bus tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct BusConfig {
    /// How long the consumer waits on an empty queue before re-checking
    /// the stop flag.
    #[serde(default = "default_poll_interval_ms")]
    #[ts(type = "number")]
    pub poll_interval_ms: u64,

    /// Maximum number of queued, undelivered messages.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            queue_capacity: default_queue_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}

/// What `send` does when the queue is full.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait for space.
    #[default]
    Block,

    /// Reject the new message.
    DropNewest,
}

fn default_data_file() -> String {
    "tasks_db.json".to_string()
}

fn default_event_capacity() -> usize {
    1000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_queue_capacity() -> usize {
    1024
}
