//! Whole-file JSON task store.
//!
//! Every operation is a load-mutate-save cycle over the entire database
//! file. Cycles are serialized by an async mutex so concurrent callers in
//! the same process never lose each other's updates. Saves go through a
//! temporary file in the same directory and are renamed into place.

use crate::store::error::{StoreError, StoreResult};
use chrono::{DateTime, Datelike, Utc};
use st_protocol::{Database, Goal, Priority, Subtask, SubtaskStatus, Task, TaskStatus};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::Mutex;

/// Input for [`TaskStore::add_task`].
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub context: Option<String>,
    pub reminder_time: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn due(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Partial update for [`TaskStore::update_task`]. `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub context: Option<String>,
    pub reminder_time: Option<String>,
}

/// Outcome of [`TaskStore::add_task`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Created(Task),
    /// A task with the same dedup key already exists; nothing was written.
    Duplicate(Task),
}

/// Status filter for [`TaskStore::list_tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl FromStr for StatusFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<TaskStatus>()
            .map(Self::Only)
            .map_err(|e| StoreError::Validation(e.to_string()))
    }
}

impl StatusFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == *status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

/// File-backed task and goal store.
pub struct TaskStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole database. A missing file is an empty database.
    pub async fn load(&self) -> StoreResult<Database> {
        let _guard = self.lock.lock().await;
        self.read_db().await
    }

    async fn read_db(&self) -> StoreResult<Database> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Database::default()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::persistence(&self.path, format!("malformed database: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Database::default()),
            Err(e) => Err(StoreError::persistence(&self.path, e)),
        }
    }

    async fn write_db(&self, db: &Database) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(db)
            .map_err(|e| StoreError::persistence(&self.path, e))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| StoreError::persistence(&self.path, e))?
    }

    /// Run one serialized load-mutate-save cycle.
    ///
    /// `op` returns the result and whether the database changed; unchanged
    /// databases are not written back.
    async fn transact<T>(
        &self,
        op: impl FnOnce(&mut Database) -> StoreResult<(T, bool)>,
    ) -> StoreResult<T> {
        let _guard = self.lock.lock().await;
        let mut db = self.read_db().await?;
        let (value, changed) = op(&mut db)?;
        if changed {
            self.write_db(&db).await?;
        }
        Ok(value)
    }

    /// Add a task unless one with the same (lower-cased title, due date) exists.
    pub async fn add_task(&self, new: NewTask) -> StoreResult<AddOutcome> {
        if new.title.trim().is_empty() {
            return Err(StoreError::Validation("Task title must not be empty".to_string()));
        }

        self.transact(|db| {
            let key = (new.title.to_lowercase(), new.due_date.as_deref());
            if let Some(existing) = db.tasks.iter().find(|t| t.dedup_key() == key) {
                return Ok((AddOutcome::Duplicate(existing.clone()), false));
            }

            let task = Task {
                id: db.next_task_id(),
                title: new.title,
                due_date: new.due_date,
                priority: new.priority,
                context: new.context.unwrap_or_default(),
                status: TaskStatus::Pending,
                created_at: Utc::now(),
                updated_at: None,
                reminder_time: new.reminder_time,
                subtasks: Vec::new(),
            };
            db.tasks.push(task.clone());
            Ok((AddOutcome::Created(task), true))
        })
        .await
    }

    /// Tasks matching `filter`, sorted by due date (missing or unparseable
    /// last), then priority rank, then id.
    pub async fn list_tasks(&self, filter: StatusFilter) -> StoreResult<Vec<Task>> {
        let db = self.load().await?;
        let mut tasks: Vec<Task> = db.tasks.into_iter().filter(|t| filter.matches(t)).collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    pub async fn update_task(&self, id: u64, update: TaskUpdate) -> StoreResult<Task> {
        self.transact(|db| {
            let task = db.find_task_mut(id).ok_or_else(|| StoreError::task_not_found(id))?;
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(due_date) = update.due_date {
                task.due_date = Some(due_date);
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(context) = update.context {
                task.context = context;
            }
            if let Some(reminder_time) = update.reminder_time {
                task.reminder_time = Some(reminder_time);
            }
            task.updated_at = Some(Utc::now());
            Ok((task.clone(), true))
        })
        .await
    }

    /// Set a task's status. The status text is validated before the lookup.
    pub async fn update_task_status(&self, id: u64, status: &str) -> StoreResult<Task> {
        let status = TaskStatus::from_str(status)
            .map_err(|_| StoreError::Validation(format!("Invalid status: {status}")))?;

        self.transact(|db| {
            let task = db.find_task_mut(id).ok_or_else(|| StoreError::task_not_found(id))?;
            task.status = status;
            task.updated_at = Some(Utc::now());
            Ok((task.clone(), true))
        })
        .await
    }

    /// Remove a task, returning it.
    pub async fn delete_task(&self, id: u64) -> StoreResult<Task> {
        self.transact(|db| {
            let index = db
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::task_not_found(id))?;
            Ok((db.tasks.remove(index), true))
        })
        .await
    }

    pub async fn add_subtasks(&self, id: u64, titles: Vec<String>) -> StoreResult<Task> {
        self.transact(|db| {
            let task = db.find_task_mut(id).ok_or_else(|| StoreError::task_not_found(id))?;
            task.subtasks.extend(titles.into_iter().map(Subtask::new));
            task.updated_at = Some(Utc::now());
            Ok((task.clone(), true))
        })
        .await
    }

    pub async fn mark_subtask_done(&self, id: u64, index: usize) -> StoreResult<Task> {
        self.transact(|db| {
            let task = db.find_task_mut(id).ok_or_else(|| StoreError::task_not_found(id))?;
            let subtask = task
                .subtasks
                .get_mut(index)
                .ok_or_else(|| StoreError::NotFound(format!("Subtask index {index} out of range.")))?;
            let now = Utc::now();
            subtask.status = SubtaskStatus::Done;
            subtask.completed_at = Some(now);
            task.updated_at = Some(now);
            Ok((task.clone(), true))
        })
        .await
    }

    /// The first `n` high-priority tasks by due date.
    pub async fn list_high_priority(&self, n: usize) -> StoreResult<Vec<Task>> {
        let db = self.load().await?;
        let mut high: Vec<Task> = db
            .tasks
            .into_iter()
            .filter(|t| t.priority == Priority::High)
            .collect();
        high.sort_by_key(|t| {
            let due = t.due();
            (due.is_none(), due)
        });
        high.truncate(n);
        Ok(high)
    }

    /// Remove tasks due in the calendar month before `now`.
    ///
    /// Tasks with a missing or unparseable due date are kept.
    pub async fn delete_previous_month_tasks(&self, now: DateTime<Utc>) -> StoreResult<Vec<Task>> {
        let (year, month) = previous_month(now);
        self.transact(|db| {
            let (removed, kept): (Vec<Task>, Vec<Task>) =
                std::mem::take(&mut db.tasks).into_iter().partition(|t| {
                    t.due()
                        .map(|due| due.year() == year && due.month() == month)
                        .unwrap_or(false)
                });
            db.tasks = kept;
            Ok((removed, true))
        })
        .await
    }

    pub async fn save_goal(
        &self,
        goal: impl Into<String>,
        horizon_months: u32,
        category: Option<String>,
    ) -> StoreResult<Goal> {
        let goal = Goal {
            goal: goal.into(),
            horizon_months,
            category: category.unwrap_or_default(),
            created_at: Utc::now(),
        };
        if goal.goal.trim().is_empty() {
            return Err(StoreError::Validation("Goal must not be empty".to_string()));
        }

        self.transact(|db| {
            db.goals.push(goal.clone());
            Ok((goal, true))
        })
        .await
    }

    pub async fn list_goals(&self) -> StoreResult<Vec<Goal>> {
        Ok(self.load().await?.goals)
    }
}

/// Sort by (due date, missing last; priority rank; id).
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| {
        let due = t.due();
        (due.is_none(), due, t.priority.rank(), t.id)
    });
}

/// Calendar month before `now`, wrapping January to December.
fn previous_month(now: DateTime<Utc>) -> (i32, u32) {
    if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    }
}

fn write_atomic(path: &Path, content: &str) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| StoreError::persistence(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::persistence(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| StoreError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::persistence(path, e.error))?;
    Ok(())
}
