//! Tool boundary over the task store.
//!
//! Each tool converts store outcomes into a [`ToolResult`] envelope and
//! records a `TOOL_EXECUTION` event on success or an `ERROR` event named
//! `<action>_failed` on failure.

use crate::observability::{elapsed_ms, EventTracker};
use crate::store::error::StoreError;
use crate::store::file_store::{AddOutcome, NewTask, StatusFilter, TaskStore, TaskUpdate};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use st_protocol::{
    default_horizon_months, EventKind, Priority, ToolErrorKind, ToolPayload, ToolResult,
};
use std::sync::Arc;
use std::time::Instant;

const TASK_MANAGER: &str = "TaskManager";
const GOAL_MANAGER: &str = "GoalManager";
const SYSTEM: &str = "System";

/// Every tool name accepted by [`TaskTools::invoke`].
pub const TOOL_NAMES: [&str; 12] = [
    "add_task",
    "list_tasks",
    "update_task",
    "update_task_status",
    "delete_task",
    "add_subtasks",
    "mark_subtask_done",
    "list_high_priority_top_n",
    "delete_previous_month_tasks",
    "save_long_term_goal",
    "list_long_term_goals",
    "get_current_time",
];

/// Agent-facing tools backed by a [`TaskStore`].
#[derive(Clone)]
pub struct TaskTools {
    store: Arc<TaskStore>,
    tracker: Arc<EventTracker>,
}

impl TaskTools {
    pub fn new(store: Arc<TaskStore>, tracker: Arc<EventTracker>) -> Self {
        Self { store, tracker }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<EventTracker> {
        &self.tracker
    }

    fn succeeded(&self, source: &str, details: Value, start: Instant) {
        self.tracker
            .log_timed_event(EventKind::ToolExecution, source, details, elapsed_ms(start));
    }

    fn failed(&self, source: &str, action: &str, error: StoreError) -> ToolResult {
        self.tracker.log_event(
            EventKind::Error,
            source,
            json!({"action": action, "error": error.to_string(), "kind": error.kind()}),
        );
        ToolResult::Error {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub async fn add_task(&self, new: NewTask) -> ToolResult {
        let start = Instant::now();
        let priority = new.priority.clone();
        match self.store.add_task(new).await {
            Ok(AddOutcome::Created(task)) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "add_task", "task_id": task.id, "title": task.title, "priority": priority}),
                    start,
                );
                let message = format!("task_created:{}", task.id);
                ToolResult::Success(ToolPayload::Task {
                    task,
                    message: Some(message),
                })
            }
            Ok(AddOutcome::Duplicate(task)) => ToolResult::Duplicate {
                message: format!("task_exists:{}", task.id),
                task,
            },
            Err(e) => self.failed(TASK_MANAGER, "add_task_failed", e),
        }
    }

    pub async fn list_tasks(&self, filter: StatusFilter) -> ToolResult {
        let start = Instant::now();
        match self.store.list_tasks(filter).await {
            Ok(tasks) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "list_tasks", "status_filter": filter.as_str(), "count": tasks.len()}),
                    start,
                );
                ToolResult::Success(ToolPayload::Tasks { tasks })
            }
            Err(e) => self.failed(TASK_MANAGER, "list_tasks_failed", e),
        }
    }

    pub async fn update_task(&self, id: u64, update: TaskUpdate) -> ToolResult {
        let start = Instant::now();
        let updated_fields = json!({
            "title": update.title.is_some(),
            "due_date": update.due_date.is_some(),
            "priority": update.priority.is_some(),
        });
        match self.store.update_task(id, update).await {
            Ok(task) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "update_task", "task_id": id, "updated_fields": updated_fields}),
                    start,
                );
                ToolResult::Success(ToolPayload::Task { task, message: None })
            }
            Err(e) => self.failed(TASK_MANAGER, "update_task_failed", e),
        }
    }

    pub async fn update_task_status(&self, id: u64, status: &str) -> ToolResult {
        let start = Instant::now();
        match self.store.update_task_status(id, status).await {
            Ok(task) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "update_task_status", "task_id": id, "new_status": status}),
                    start,
                );
                ToolResult::Success(ToolPayload::Task { task, message: None })
            }
            Err(e) => self.failed(TASK_MANAGER, "update_task_status_failed", e),
        }
    }

    pub async fn delete_task(&self, id: u64) -> ToolResult {
        let start = Instant::now();
        match self.store.delete_task(id).await {
            Ok(_) => {
                self.succeeded(TASK_MANAGER, json!({"action": "delete_task", "task_id": id}), start);
                ToolResult::Success(ToolPayload::Message {
                    message: format!("Task {id} deleted."),
                })
            }
            Err(e) => self.failed(TASK_MANAGER, "delete_task_failed", e),
        }
    }

    pub async fn add_subtasks(&self, id: u64, titles: Vec<String>) -> ToolResult {
        let start = Instant::now();
        let count = titles.len();
        match self.store.add_subtasks(id, titles).await {
            Ok(task) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "add_subtasks", "task_id": id, "subtask_count": count}),
                    start,
                );
                ToolResult::Success(ToolPayload::Task { task, message: None })
            }
            Err(e) => self.failed(TASK_MANAGER, "add_subtasks_failed", e),
        }
    }

    /// Negative indexes are reported as out of range.
    pub async fn mark_subtask_done(&self, id: u64, index: i64) -> ToolResult {
        let start = Instant::now();
        let result = match usize::try_from(index) {
            Ok(i) => self.store.mark_subtask_done(id, i).await,
            Err(_) => Err(StoreError::NotFound(format!("Subtask index {index} out of range."))),
        };
        match result {
            Ok(task) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "mark_subtask_done", "task_id": id, "subtask_index": index}),
                    start,
                );
                ToolResult::Success(ToolPayload::Task { task, message: None })
            }
            Err(e) => self.failed(TASK_MANAGER, "mark_subtask_done_failed", e),
        }
    }

    pub async fn list_high_priority_top_n(&self, n: usize) -> ToolResult {
        let start = Instant::now();
        match self.store.list_high_priority(n).await {
            Ok(tasks) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "list_high_priority_top_n", "count": tasks.len()}),
                    start,
                );
                ToolResult::Success(ToolPayload::Tasks { tasks })
            }
            Err(e) => self.failed(TASK_MANAGER, "list_high_priority_failed", e),
        }
    }

    pub async fn delete_previous_month_tasks(&self) -> ToolResult {
        let start = Instant::now();
        match self.store.delete_previous_month_tasks(Utc::now()).await {
            Ok(deleted_tasks) => {
                self.succeeded(
                    TASK_MANAGER,
                    json!({"action": "delete_previous_month_tasks", "deleted_count": deleted_tasks.len()}),
                    start,
                );
                ToolResult::Success(ToolPayload::Deleted {
                    deleted_count: deleted_tasks.len(),
                    deleted_tasks,
                })
            }
            Err(e) => self.failed(TASK_MANAGER, "delete_previous_month_failed", e),
        }
    }

    pub async fn save_long_term_goal(
        &self,
        goal: &str,
        horizon_months: u32,
        category: Option<String>,
    ) -> ToolResult {
        let start = Instant::now();
        match self.store.save_goal(goal, horizon_months, category).await {
            Ok(goal) => {
                self.succeeded(
                    GOAL_MANAGER,
                    json!({"action": "save_long_term_goal", "goal": goal.goal, "horizon_months": horizon_months}),
                    start,
                );
                ToolResult::Success(ToolPayload::Goal { goal })
            }
            Err(e) => self.failed(GOAL_MANAGER, "save_goal_failed", e),
        }
    }

    pub async fn list_long_term_goals(&self) -> ToolResult {
        let start = Instant::now();
        match self.store.list_goals().await {
            Ok(goals) => {
                self.succeeded(
                    GOAL_MANAGER,
                    json!({"action": "list_long_term_goals", "count": goals.len()}),
                    start,
                );
                ToolResult::Success(ToolPayload::Goals { goals })
            }
            Err(e) => self.failed(GOAL_MANAGER, "list_goals_failed", e),
        }
    }

    /// Current UTC time. The timezone is echoed back, not applied.
    pub fn get_current_time(&self, timezone: &str) -> ToolResult {
        let start = Instant::now();
        let time_utc = Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        self.succeeded(SYSTEM, json!({"action": "get_current_time", "timezone": timezone}), start);
        ToolResult::Success(ToolPayload::Time {
            timezone: timezone.to_string(),
            time_utc,
        })
    }

    /// Call a tool by name with JSON arguments.
    ///
    /// Unknown names and malformed arguments yield a `validation` error
    /// envelope; nothing is logged for them.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolResult {
        let args = if args.is_null() { json!({}) } else { args };

        match name {
            "add_task" => match parse_args::<AddTaskArgs>(name, args) {
                Ok(a) => {
                    self.add_task(NewTask {
                        title: a.title,
                        due_date: a.due_date,
                        priority: a.priority,
                        context: a.context,
                        reminder_time: a.reminder_time,
                    })
                    .await
                }
                Err(e) => e,
            },
            "list_tasks" => match parse_args::<ListTasksArgs>(name, args) {
                Ok(a) => match a.status.parse::<StatusFilter>() {
                    Ok(filter) => self.list_tasks(filter).await,
                    Err(e) => validation(e.to_string()),
                },
                Err(e) => e,
            },
            "update_task" => match parse_args::<UpdateTaskArgs>(name, args) {
                Ok(a) => {
                    let update = TaskUpdate {
                        title: a.title,
                        due_date: a.due_date,
                        priority: a.priority,
                        context: a.context,
                        reminder_time: a.reminder_time,
                    };
                    self.update_task(a.task_id, update).await
                }
                Err(e) => e,
            },
            "update_task_status" => match parse_args::<UpdateStatusArgs>(name, args) {
                Ok(a) => self.update_task_status(a.task_id, &a.status).await,
                Err(e) => e,
            },
            "delete_task" => match parse_args::<TaskIdArgs>(name, args) {
                Ok(a) => self.delete_task(a.task_id).await,
                Err(e) => e,
            },
            "add_subtasks" => match parse_args::<AddSubtasksArgs>(name, args) {
                Ok(a) => self.add_subtasks(a.task_id, a.subtasks).await,
                Err(e) => e,
            },
            "mark_subtask_done" => match parse_args::<MarkSubtaskArgs>(name, args) {
                Ok(a) => self.mark_subtask_done(a.task_id, a.subtask_index).await,
                Err(e) => e,
            },
            "list_high_priority_top_n" => match parse_args::<TopNArgs>(name, args) {
                Ok(a) => self.list_high_priority_top_n(a.n).await,
                Err(e) => e,
            },
            "delete_previous_month_tasks" => self.delete_previous_month_tasks().await,
            "save_long_term_goal" => match parse_args::<SaveGoalArgs>(name, args) {
                Ok(a) => {
                    self.save_long_term_goal(&a.goal, a.horizon_months, a.category)
                        .await
                }
                Err(e) => e,
            },
            "list_long_term_goals" => self.list_long_term_goals().await,
            "get_current_time" => match parse_args::<TimeArgs>(name, args) {
                Ok(a) => self.get_current_time(&a.timezone),
                Err(e) => e,
            },
            other => validation(format!("Unknown tool: {other}")),
        }
    }
}

fn validation(message: String) -> ToolResult {
    ToolResult::Error {
        kind: ToolErrorKind::Validation,
        message,
    }
}

fn parse_args<T: DeserializeOwned>(name: &str, args: Value) -> Result<T, ToolResult> {
    serde_json::from_value(args).map_err(|e| validation(format!("Invalid arguments for {name}: {e}")))
}

#[derive(Deserialize)]
struct AddTaskArgs {
    title: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    reminder_time: Option<String>,
}

#[derive(Deserialize)]
struct ListTasksArgs {
    #[serde(default = "default_status_filter")]
    status: String,
}

fn default_status_filter() -> String {
    "all".to_string()
}

#[derive(Deserialize)]
struct UpdateTaskArgs {
    task_id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    reminder_time: Option<String>,
}

#[derive(Deserialize)]
struct UpdateStatusArgs {
    task_id: u64,
    status: String,
}

#[derive(Deserialize)]
struct TaskIdArgs {
    task_id: u64,
}

#[derive(Deserialize)]
struct AddSubtasksArgs {
    task_id: u64,
    subtasks: Vec<String>,
}

#[derive(Deserialize)]
struct MarkSubtaskArgs {
    task_id: u64,
    subtask_index: i64,
}

#[derive(Deserialize)]
struct TopNArgs {
    #[serde(default = "default_top_n")]
    n: usize,
}

fn default_top_n() -> usize {
    5
}

#[derive(Deserialize)]
struct SaveGoalArgs {
    goal: String,
    #[serde(default = "default_horizon_months")]
    horizon_months: u32,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Deserialize)]
struct TimeArgs {
    #[serde(default = "default_timezone")]
    timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}
