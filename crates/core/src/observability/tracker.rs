//! Event tracker implementation.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use st_protocol::{json_object, Event, EventKind, MetricsSummary, RecentEvent};
use std::collections::VecDeque;
use std::time::Instant;
use uuid::Uuid;

/// Default number of retained events.
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Number of events included in [`MetricsSummary::recent_events`].
const RECENT_EVENTS: usize = 10;

/// Milliseconds elapsed since `start`, as a real number.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Process-wide, bounded, append-only event log.
///
/// When the log grows past its capacity the oldest events are evicted
/// (FIFO by insertion). All methods take `&self`; the log is guarded by a
/// mutex whose critical sections never suspend.
pub struct EventTracker {
    events: Mutex<VecDeque<Event>>,
    capacity: usize,
    started_at: DateTime<Utc>,
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventTracker {
    /// Create a tracker retaining at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_EVENT_CAPACITY))),
            capacity,
            started_at: Utc::now(),
        }
    }

    /// Record an event with zero duration.
    pub fn log_event(&self, kind: EventKind, source_name: impl Into<String>, details: Value) -> Event {
        self.log_timed_event(kind, source_name, details, 0.0)
    }

    /// Record an event with a measured duration in milliseconds.
    ///
    /// Negative or non-finite durations are stored as 0.
    pub fn log_timed_event(
        &self,
        kind: EventKind,
        source_name: impl Into<String>,
        details: Value,
        duration_ms: f64,
    ) -> Event {
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            0.0
        };

        let event = Event {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            source_name: source_name.into(),
            details: json_object(details),
            duration_ms,
        };

        mirror_to_tracing(&event);

        let mut events = self.events.lock();
        events.push_back(event.clone());
        while events.len() > self.capacity {
            events.pop_front();
        }

        event
    }

    /// Events matching the optional filters, in insertion order.
    pub fn get_events(&self, source_name: Option<&str>, kind: Option<EventKind>) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| source_name.map_or(true, |name| e.source_name == name))
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .cloned()
            .collect()
    }

    /// Snapshot of every retained event.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counts per kind plus the ten most recent events.
    pub fn metrics(&self) -> MetricsSummary {
        let events = self.events.lock();
        let count = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

        let skip = events.len().saturating_sub(RECENT_EVENTS);
        let recent_events = events.iter().skip(skip).map(RecentEvent::from).collect();

        MetricsSummary {
            total_events: events.len(),
            agent_calls: count(EventKind::AgentCall),
            tool_executions: count(EventKind::ToolExecution),
            a2a_messages: count(EventKind::A2ACommunication),
            errors: count(EventKind::Error),
            sessions_created: count(EventKind::SessionCreated),
            uptime_seconds: (Utc::now() - self.started_at).num_seconds(),
            recent_events,
        }
    }
}

fn mirror_to_tracing(event: &Event) {
    let details = Value::Object(event.details.clone());
    if event.kind == EventKind::Error {
        tracing::warn!(
            kind = %event.kind,
            source = %event.source_name,
            details = %details,
            "{}",
            event.action()
        );
    } else {
        tracing::info!(
            kind = %event.kind,
            source = %event.source_name,
            details = %details,
            duration_ms = event.duration_ms,
            "{}",
            event.action()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_event_assigns_identity() {
        let tracker = EventTracker::default();
        let a = tracker.log_event(EventKind::AgentCall, "Orchestrator", json!({"action": "x"}));
        let b = tracker.log_event(EventKind::AgentCall, "Orchestrator", json!({"action": "x"}));

        assert_ne!(a.id, b.id);
        assert!(a.timestamp <= b.timestamp);
        assert_eq!(a.duration_ms, 0.0);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let tracker = EventTracker::default();
        for i in 0..1001 {
            tracker.log_event(EventKind::ToolExecution, "TaskManager", json!({"action": "add_task", "n": i}));
        }

        let events = tracker.events();
        assert_eq!(events.len(), 1000);
        assert_eq!(events[0].details["n"], json!(1));
        assert_eq!(events[999].details["n"], json!(1000));
    }

    #[test]
    fn test_small_capacity_keeps_last_entries() {
        let tracker = EventTracker::new(3);
        for i in 0..10 {
            tracker.log_event(EventKind::Error, "x", json!({"n": i}));
        }
        let ns: Vec<_> = tracker.events().iter().map(|e| e.details["n"].clone()).collect();
        assert_eq!(ns, vec![json!(7), json!(8), json!(9)]);
    }

    #[test]
    fn test_get_events_filters_conjunctively() {
        let tracker = EventTracker::default();
        tracker.log_event(EventKind::AgentCall, "a", json!({}));
        tracker.log_event(EventKind::Error, "a", json!({}));
        tracker.log_event(EventKind::Error, "b", json!({}));

        assert_eq!(tracker.get_events(None, None).len(), 3);
        assert_eq!(tracker.get_events(Some("a"), None).len(), 2);
        assert_eq!(tracker.get_events(None, Some(EventKind::Error)).len(), 2);
        assert_eq!(tracker.get_events(Some("a"), Some(EventKind::Error)).len(), 1);
        assert!(tracker.get_events(Some("c"), None).is_empty());
    }

    #[test]
    fn test_timed_event_clamps_negative_duration() {
        let tracker = EventTracker::default();
        let event = tracker.log_timed_event(EventKind::AgentCall, "a", json!({}), -5.0);
        assert_eq!(event.duration_ms, 0.0);
        let event = tracker.log_timed_event(EventKind::AgentCall, "a", json!({}), 12.5);
        assert_eq!(event.duration_ms, 12.5);
    }

    #[test]
    fn test_metrics_counts_and_recent_events() {
        let tracker = EventTracker::default();
        for _ in 0..12 {
            tracker.log_event(EventKind::ToolExecution, "TaskManager", json!({"action": "list_tasks"}));
        }
        tracker.log_event(EventKind::Error, "Orchestrator", json!({"error": "boom"}));
        tracker.log_event(EventKind::SessionCreated, "agent", json!({"action": "session_created"}));

        let metrics = tracker.metrics();
        assert_eq!(metrics.total_events, 14);
        assert_eq!(metrics.tool_executions, 12);
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.sessions_created, 1);
        assert_eq!(metrics.agent_calls, 0);
        assert_eq!(metrics.recent_events.len(), 10);

        let last_two: Vec<_> = metrics.recent_events[8..].iter().map(|e| e.action.as_str()).collect();
        assert_eq!(last_two, vec!["unknown", "session_created"]);
    }
}
