//! Sequential multi-agent workflow.
//!
//! The Orchestrator routes a request to a primary agent, optionally
//! involves one secondary agent based on the primary response, and joins
//! both answers into the text returned to the user. Every step is recorded
//! on the shared [`EventTracker`].

pub mod routing;
pub mod workflow;

pub use routing::RoutingTable;
pub use workflow::{WorkflowPhase, WorkflowRun, NO_SECONDARY};

use crate::agents::{AgentError, AgentEvent, AgentRegistry, ExecutionContext, SessionService};
use crate::observability::{elapsed_ms, EventTracker};
use serde_json::json;
use st_protocol::EventKind;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_stream::StreamExt;

const ORCHESTRATOR_SOURCE: &str = "Orchestrator";

/// Joins the primary and secondary responses.
pub const RESPONSE_SEPARATOR: &str = "\n\n---\n\n";

pub const NO_RESPONSE: &str = "No response generated.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    #[error("Agent '{0}' is not registered")]
    UnknownAgent(String),
}

pub struct Orchestrator {
    registry: AgentRegistry,
    routing: RoutingTable,
    tracker: Arc<EventTracker>,
    sessions: SessionService,
    project_path: Option<String>,
}

impl Orchestrator {
    /// Create an orchestrator with the built-in routing rules.
    pub fn new(registry: AgentRegistry, tracker: Arc<EventTracker>) -> Self {
        Self {
            registry,
            routing: RoutingTable::default(),
            sessions: SessionService::new(tracker.clone()),
            tracker,
            project_path: None,
        }
    }

    pub fn with_routing(mut self, routing: RoutingTable) -> Self {
        self.routing = routing;
        self
    }

    /// Working directory handed to command agents.
    pub fn with_project_path(mut self, path: impl Into<String>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &Arc<EventTracker> {
        &self.tracker
    }

    /// Run one request through the primary and, if needed, secondary agent.
    ///
    /// Always returns text. Agent failures are folded into the response;
    /// anything else is reported as an apology and an ERROR
    /// `workflow_failed` event.
    pub async fn execute_workflow(&self, input: &str, user_id: &str) -> String {
        match self.run_workflow(input, user_id).await {
            Ok(response) => response,
            Err(e) => {
                self.tracker.log_event(
                    EventKind::Error,
                    ORCHESTRATOR_SOURCE,
                    json!({"action": "workflow_failed", "error": e.to_string()}),
                );
                format!("I encountered an error while processing your request: {e}")
            }
        }
    }

    async fn run_workflow(&self, input: &str, user_id: &str) -> Result<String, OrchestratorError> {
        let mut run = WorkflowRun::new();

        let primary = self.routing.route(input);
        run.start_primary(primary);
        self.tracker.log_event(
            EventKind::AgentCall,
            ORCHESTRATOR_SOURCE,
            json!({"action": "workflow_start", "input": input, "primary_agent": primary}),
        );

        let primary_response = self.run_agent(primary, input, user_id).await?;

        let response = match self.routing.secondary_for(input, &primary_response) {
            Some(secondary) => {
                run.start_secondary(secondary);
                let secondary_response = self.run_agent(secondary, input, user_id).await?;
                format!("{primary_response}{RESPONSE_SEPARATOR}{secondary_response}")
            }
            None => primary_response,
        };

        run.finish();
        let duration_ms = run.elapsed_ms();
        self.tracker.log_timed_event(
            EventKind::AgentCall,
            ORCHESTRATOR_SOURCE,
            json!({
                "action": "workflow_complete",
                "duration_ms": duration_ms,
                "agents_involved": run.agents_involved(),
            }),
            duration_ms,
        );

        Ok(response)
    }

    /// Run `name` once in a fresh session.
    ///
    /// Only an unregistered agent is an error; executor failures become the
    /// returned text.
    async fn run_agent(&self, name: &str, input: &str, user_id: &str) -> Result<String, OrchestratorError> {
        let start = Instant::now();
        if !self.registry.has_agent(name) {
            return Err(OrchestratorError::UnknownAgent(name.to_string()));
        }

        let session = self.sessions.create(&format!("agent_{name}"), user_id);
        let mut context = ExecutionContext::new(input)
            .with_user(user_id)
            .with_session(session.id);
        if let Some(path) = &self.project_path {
            context = context.with_project_path(path.clone());
        }

        let outcome = self.collect_response(name, &context).await;

        let response = match outcome {
            Ok(text) if text.is_empty() => NO_RESPONSE.to_string(),
            Ok(text) => text,
            Err(e) => {
                self.tracker.log_event(
                    EventKind::Error,
                    name,
                    json!({"action": "execution_failed", "error": e.to_string()}),
                );
                format!("Agent {name} encountered an error: {e}")
            }
        };

        self.tracker.log_timed_event(
            EventKind::AgentCall,
            name,
            json!({"action": "agent_execution", "input_length": input.chars().count()}),
            elapsed_ms(start),
        );

        Ok(response)
    }

    /// Drain the agent stream, keeping the last final response.
    async fn collect_response(&self, name: &str, context: &ExecutionContext) -> Result<String, AgentError> {
        let mut stream = self.registry.execute(name, context).await?;
        let mut final_response = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                AgentEvent::Final(text) => final_response = text,
                AgentEvent::Thought(thought) => tracing::debug!(agent = name, %thought, "agent thought"),
                AgentEvent::ToolCall(call) => tracing::debug!(agent = name, %call, "tool call"),
                AgentEvent::MessageChunk(_) => {}
            }
        }

        Ok(final_response)
    }
}
