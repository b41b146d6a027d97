//! Bounded observability event log.
//!
//! Every layer (bus, orchestrator, tools) records what it did through a
//! shared [`EventTracker`]. Events are also mirrored to `tracing`.

pub mod tracker;

pub use tracker::{elapsed_ms, EventTracker, DEFAULT_EVENT_CAPACITY};
