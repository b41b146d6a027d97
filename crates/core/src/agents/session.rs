use crate::observability::EventTracker;
use chrono::{DateTime, Utc};
use serde_json::json;
use st_protocol::EventKind;
use std::sync::Arc;
use uuid::Uuid;

/// A single-use conversation scope for one agent run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub app_name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Creates sessions and records a `SESSION_CREATED` event for each.
#[derive(Clone)]
pub struct SessionService {
    tracker: Arc<EventTracker>,
}

impl SessionService {
    pub fn new(tracker: Arc<EventTracker>) -> Self {
        Self { tracker }
    }

    pub fn create(&self, app_name: &str, user_id: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };

        self.tracker.log_event(
            EventKind::SessionCreated,
            app_name,
            json!({
                "action": "session_created",
                "session_id": session.id.to_string(),
                "user_id": user_id,
                "app_name": app_name,
            }),
        );

        session
    }
}
