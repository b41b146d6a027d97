//! Event assertion helpers.

use st_protocol::{Event, EventKind};

/// Whether any event carries `details.action == action`.
#[allow(dead_code)]
pub fn has_action(events: &[Event], action: &str) -> bool {
    events.iter().any(|e| e.action() == action)
}

/// Events with the given action, in log order.
#[allow(dead_code)]
pub fn events_with_action<'a>(events: &'a [Event], action: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.action() == action).collect()
}

#[allow(dead_code)]
pub fn count_kind(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

/// Assert that `actions` appear in this relative order.
///
/// Other events may be interleaved.
#[allow(dead_code)]
pub fn assert_action_sequence(events: &[Event], actions: &[&str]) {
    let observed: Vec<&str> = events.iter().map(Event::action).collect();
    let mut position = 0;
    for action in actions {
        match observed[position..].iter().position(|a| a == action) {
            Some(offset) => position += offset + 1,
            None => panic!("Expected action '{action}' in order {actions:?}, got: {observed:?}"),
        }
    }
}
