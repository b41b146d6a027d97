use crate::chat::command::{has_quick_keyword, QuickCommand};
use crate::orchestrator::Orchestrator;
use crate::store::{NewTask, StatusFilter, TaskTools};
use st_protocol::{Task, ToolResult};
use std::sync::Arc;

const MAX_LISTED_TASKS: usize = 10;

/// Front door for user text: quick commands first, agents otherwise.
pub struct ChatService {
    tools: TaskTools,
    orchestrator: Arc<Orchestrator>,
}

impl ChatService {
    pub fn new(tools: TaskTools, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            tools,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Answer `text` through a quick command when it mentions a quick
    /// command keyword and parses; otherwise run the agent workflow.
    pub async fn hybrid_chat(&self, text: &str, user_id: &str) -> String {
        if has_quick_keyword(text) {
            if let Some(reply) = self.quick_reply(text).await {
                return reply;
            }
        }
        self.orchestrator.execute_workflow(text, user_id).await
    }

    /// Answer `text` directly from the tools, if it is a quick command.
    pub async fn quick_reply(&self, text: &str) -> Option<String> {
        let command = QuickCommand::parse(text)?;
        Some(self.run(command).await)
    }

    async fn run(&self, command: QuickCommand) -> String {
        match command {
            QuickCommand::Greeting(reply) => reply.to_string(),
            QuickCommand::AddTask {
                title,
                due,
                priority,
            } => {
                let mut new = NewTask::new(title.clone()).priority(priority.clone());
                if let Some(due) = &due {
                    new = new.due(due.clone());
                }
                match self.tools.add_task(new).await {
                    ToolResult::Duplicate { task, .. } => {
                        format!("⚠️ Task already exists! ID: {}", task.id)
                    }
                    ToolResult::Error { message, .. } => format!("❌ {message}"),
                    created => {
                        let id = created.task().map(|t| t.id).unwrap_or_default();
                        let due = due.map(|d| format!(", Due: {d}")).unwrap_or_default();
                        format!("✅ Task created! ID: {id}, Title: '{title}'{due}, Priority: {priority}")
                    }
                }
            }
            QuickCommand::ListTasks => {
                let result = self.tools.list_tasks(StatusFilter::All).await;
                if let ToolResult::Error { message, .. } = &result {
                    return format!("❌ {message}");
                }
                match result.tasks() {
                    Some(tasks) if !tasks.is_empty() => {
                        let lines: Vec<String> = tasks
                            .iter()
                            .take(MAX_LISTED_TASKS)
                            .map(|t| {
                                format!(
                                    "#{}: {} - {} priority - {}{}",
                                    t.id,
                                    t.title,
                                    t.priority,
                                    t.status,
                                    due_suffix(t)
                                )
                            })
                            .collect();
                        format!("📋 Your tasks:\n{}", lines.join("\n"))
                    }
                    _ => "No tasks found. Add one with 'add [task description]'".to_string(),
                }
            }
            QuickCommand::ListGoals => {
                let result = self.tools.list_long_term_goals().await;
                if let ToolResult::Error { message, .. } = &result {
                    return format!("❌ {message}");
                }
                match result.goals() {
                    Some(goals) if !goals.is_empty() => {
                        let lines: Vec<String> = goals
                            .iter()
                            .map(|g| {
                                let category = if g.category.is_empty() {
                                    String::new()
                                } else {
                                    format!(" - {}", g.category)
                                };
                                format!("🎯 {} ({} months){category}", g.goal, g.horizon_months)
                            })
                            .collect();
                        format!("Your goals:\n{}", lines.join("\n"))
                    }
                    _ => "No goals found. Add one with 'I want to [goal] in [timeframe]'".to_string(),
                }
            }
            QuickCommand::ShowTop(n) => {
                let result = self.tools.list_high_priority_top_n(n).await;
                if let ToolResult::Error { message, .. } = &result {
                    return format!("❌ {message}");
                }
                match result.tasks() {
                    Some(tasks) if !tasks.is_empty() => {
                        let lines: Vec<String> = tasks
                            .iter()
                            .map(|t| format!("🚨 #{}: {}{}", t.id, t.title, due_suffix(t)))
                            .collect();
                        format!("🔝 Top {n} high priority tasks:\n{}", lines.join("\n"))
                    }
                    _ => "No high priority tasks found.".to_string(),
                }
            }
            QuickCommand::DeletePreviousMonth => match self.tools.delete_previous_month_tasks().await {
                ToolResult::Error { message, .. } => format!("❌ Cleanup failed: {message}"),
                result => {
                    let count = result.tasks().map(<[Task]>::len).unwrap_or_default();
                    format!("🧹 Cleaned up {count} tasks from previous month")
                }
            },
        }
    }
}

fn due_suffix(task: &Task) -> String {
    task.due_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(" (due: {d})"))
        .unwrap_or_default()
}
