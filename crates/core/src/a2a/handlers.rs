//! Built-in A2A handlers for the three standard agents.
//!
//! | Agent | Message type | Reply |
//! |---|---|---|
//! | `task_manager_agent` | `decompose_goal` | `goal_decomposed` |
//! | `goal_planning_agent` | `suggest_goals_from_tasks` | `goals_created_from_patterns` |
//! | `analysis_agent` | `generate_productivity_report` | `productivity_report` |
//!
//! Any other message type is accepted and ignored.

use crate::a2a::bus::{MessageBus, Outbox};
use crate::a2a::error::HandlerError;
use crate::a2a::handler::MessageHandler;
use crate::agents::AgentKind;
use crate::store::{NewTask, StatusFilter, TaskTools};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use st_protocol::{A2AMessage, Priority, TaskStatus, ToolResult};
use std::sync::Arc;

const DEFAULT_HORIZON_MONTHS: u64 = 6;
const MEETING_GOAL: &str = "Improve meeting efficiency and productivity";

/// Register the three built-in handlers on `bus`.
pub fn register_default_handlers(bus: &MessageBus, tools: &TaskTools) {
    let outbox = bus.outbox();
    bus.register_agent(
        AgentKind::TaskManager.name(),
        Arc::new(TaskManagerHandler::new(tools.clone(), outbox.clone())),
    );
    bus.register_agent(
        AgentKind::GoalPlanning.name(),
        Arc::new(GoalPlanningHandler::new(tools.clone(), outbox.clone())),
    );
    bus.register_agent(
        AgentKind::Analysis.name(),
        Arc::new(AnalysisHandler::new(tools.clone(), outbox)),
    );
}

fn tool_failure(result: &ToolResult) -> HandlerError {
    HandlerError::Tool(result.message().unwrap_or("unknown tool error").to_string())
}

/// Turns a long-term goal into a high-priority task.
pub struct TaskManagerHandler {
    tools: TaskTools,
    outbox: Outbox,
}

impl TaskManagerHandler {
    pub fn new(tools: TaskTools, outbox: Outbox) -> Self {
        Self { tools, outbox }
    }

    async fn decompose_goal(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        let goal = message
            .content_str("goal")
            .ok_or_else(|| HandlerError::MissingField("goal".to_string()))?;
        let horizon = match message.content.get("horizon_months") {
            None | Some(Value::Null) => DEFAULT_HORIZON_MONTHS,
            Some(value) => value.as_u64().ok_or_else(|| HandlerError::InvalidField {
                field: "horizon_months".to_string(),
                reason: format!("expected a non-negative integer, got {value}"),
            })?,
        };

        let due = i64::try_from(horizon.saturating_mul(30))
            .ok()
            .and_then(Duration::try_days)
            .and_then(|offset| Utc::now().naive_utc().checked_add_signed(offset))
            .ok_or_else(|| HandlerError::InvalidField {
                field: "horizon_months".to_string(),
                reason: format!("{horizon} months is out of range"),
            })?;

        let result = self
            .tools
            .add_task(
                NewTask::new(format!("Achieve: {goal}"))
                    .due(due.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
                    .priority(Priority::High)
                    .context(format!("Long-term goal: {goal}")),
            )
            .await;

        let task_id = match &result {
            ToolResult::Success(_) => result.task().map(|t| t.id),
            _ => None,
        };

        let reply = A2AMessage::new(
            AgentKind::TaskManager.name(),
            message.from_agent.as_str(),
            "goal_decomposed",
            json!({
                "original_goal": goal,
                "main_task_created": result.is_success(),
                "task_id": task_id,
            }),
        );
        self.outbox.send(reply).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for TaskManagerHandler {
    async fn handle(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        match message.message_type.as_str() {
            "decompose_goal" => self.decompose_goal(message).await,
            _ => Ok(()),
        }
    }
}

/// Derives goals from observed task patterns.
pub struct GoalPlanningHandler {
    tools: TaskTools,
    outbox: Outbox,
}

impl GoalPlanningHandler {
    pub fn new(tools: TaskTools, outbox: Outbox) -> Self {
        Self { tools, outbox }
    }

    async fn suggest_goals(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        let patterns: Vec<&str> = message
            .content
            .get("patterns")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut goals_created = 0usize;
        for pattern in patterns.iter().take(2) {
            if pattern.to_lowercase().contains("meeting") {
                let result = self
                    .tools
                    .save_long_term_goal(MEETING_GOAL, 3, Some("productivity".to_string()))
                    .await;
                if result.is_success() {
                    goals_created += 1;
                }
            }
        }

        let reply = A2AMessage::new(
            AgentKind::GoalPlanning.name(),
            message.from_agent.as_str(),
            "goals_created_from_patterns",
            json!({"goals_created": goals_created}),
        );
        self.outbox.send(reply).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for GoalPlanningHandler {
    async fn handle(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        match message.message_type.as_str() {
            "suggest_goals_from_tasks" => self.suggest_goals(message).await,
            _ => Ok(()),
        }
    }
}

/// Produces productivity reports from the store.
pub struct AnalysisHandler {
    tools: TaskTools,
    outbox: Outbox,
}

impl AnalysisHandler {
    pub fn new(tools: TaskTools, outbox: Outbox) -> Self {
        Self { tools, outbox }
    }

    async fn productivity_report(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        let tasks_result = self.tools.list_tasks(StatusFilter::All).await;
        let tasks = tasks_result.tasks().ok_or_else(|| tool_failure(&tasks_result))?;
        let goals_result = self.tools.list_long_term_goals().await;
        let goals = goals_result.goals().ok_or_else(|| tool_failure(&goals_result))?;

        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
        let pending = tasks.iter().filter(|t| t.status == TaskStatus::Pending).count();

        let reply = A2AMessage::new(
            AgentKind::Analysis.name(),
            message.from_agent.as_str(),
            "productivity_report",
            json!({
                "total_tasks": total,
                "completed_tasks": completed,
                "pending_tasks": pending,
                "completion_rate": completed as f64 / total.max(1) as f64,
                "active_goals": goals.len(),
                "report_generated_at": Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            }),
        );
        self.outbox.send(reply).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for AnalysisHandler {
    async fn handle(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        match message.message_type.as_str() {
            "generate_productivity_report" => self.productivity_report(message).await,
            _ => Ok(()),
        }
    }
}
