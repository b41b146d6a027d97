//! Task and goal records persisted in the JSON database file.
//!
//! The database is a single pretty-printed JSON object:
//!
//! ```json
//! { "tasks": [ ... ], "goals": [ ... ] }
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Priority of a task.
///
/// Parsing is lenient: anything other than `high`, `medium` or `low`
/// (case-insensitive) becomes [`Priority::Unknown`], which sorts last and
/// is written back with its original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, TS)]
#[ts(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Unknown(String),
}

impl Priority {
    /// Sort rank: high=0, medium=1, low=2, unknown=3.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
            Self::Unknown(_) => 3,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown(text) => text,
        }
    }

    /// Lenient parse used by both serde and the chat front end.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Priority::parse_lenient(&s))
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Lifecycle status of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the allowed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Must be one of: pending, in_progress, done",
            self.0
        )
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// Status of a subtask.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
pub enum SubtaskStatus {
    #[default]
    Pending,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub status: SubtaskStatus,
    #[serde(deserialize_with = "lenient_timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: SubtaskStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// A task record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Task {
    /// Positive integer, unique within the database.
    #[ts(type = "number")]
    pub id: u64,

    pub title: String,

    /// ISO date (`2024-01-31`) or date-time (`2024-01-31T09:00:00`).
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(deserialize_with = "lenient_timestamp::deserialize")]
    pub created_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "lenient_timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub reminder_time: Option<String>,

    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// The parsed due date, if present and parseable.
    pub fn due(&self) -> Option<NaiveDateTime> {
        self.due_date.as_deref().and_then(parse_due)
    }

    /// Dedup key: lower-cased title and exact due date text.
    pub fn dedup_key(&self) -> (String, Option<&str>) {
        (self.title.to_lowercase(), self.due_date.as_deref())
    }
}

/// Parse a due-date string.
///
/// Accepts RFC 3339 (converted to UTC), naive ISO date-times with `T` or a
/// space separator, and date-only strings (read as midnight).
pub fn parse_due(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse a record timestamp.
///
/// RFC 3339 keeps its offset; naive date-times and dates (the formats
/// [`parse_due`] accepts) are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    parse_due(text).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde readers for timestamps written with or without a UTC offset.
pub mod lenient_timestamp {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{text}'")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) => parse_timestamp(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{text}'"))),
        }
    }
}

/// A long-term goal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Goal {
    pub goal: String,
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
    #[serde(default)]
    pub category: String,
    #[serde(deserialize_with = "lenient_timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

pub fn default_horizon_months() -> u32 {
    6
}

/// Root of the JSON database file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
pub struct Database {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Database {
    /// Max existing id + 1, or 1 for an empty database.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn find_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}
