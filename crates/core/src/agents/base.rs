//! The executor seam: what the orchestrator needs from an agent.
//!
//! An agent turns one request into a stream of [`AgentEvent`]s ending in a
//! `Final` response. Routing, sessions and event logging live above this
//! trait, so adapters only deal with producing text.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;
use uuid::Uuid;

/// Everything an agent run gets to see about its caller.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// The user's request text.
    pub instruction: String,

    /// Identity of the requesting user.
    pub user_id: String,

    /// Session created for this single agent run.
    pub session_id: Uuid,

    /// Working directory for agents that spawn processes.
    pub project_path: String,
}

impl ExecutionContext {
    /// A context for `instruction` from `default_user`, in a fresh session,
    /// rooted at the current directory.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            user_id: "default_user".to_string(),
            session_id: Uuid::new_v4(),
            project_path: std::env::current_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|_| String::from(".")),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_project_path(mut self, path: impl Into<String>) -> Self {
        self.project_path = path.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    Thought(String),
    /// A tool invocation and a summary of its result.
    ToolCall(String),
    /// Partial response text.
    MessageChunk(String),
    /// The complete response. Terminal.
    Final(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Agent not available: {0}")]
    NotAvailable(String),
    #[error("API call failed: {0}")]
    ApiError(String),
    #[error("Stream parsing error: {0}")]
    StreamParseError(String),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

pub type AgentStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

/// The executor capability behind a named agent.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn check_availability(&self) -> bool;
    async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    /// Greets the caller by user id, or refuses when offline.
    struct GreeterAgent {
        online: bool,
    }

    #[async_trait]
    impl Agent for GreeterAgent {
        async fn check_availability(&self) -> bool {
            self.online
        }

        async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError> {
            if !self.online {
                return Err(AgentError::NotAvailable("greeter is offline".to_string()));
            }

            let greeting = format!("Hello {}, you asked: {}", context.user_id, context.instruction);
            let stream = tokio_stream::iter(vec![
                Ok(AgentEvent::Thought("composing greeting".to_string())),
                Ok(AgentEvent::MessageChunk("Hello ".to_string())),
                Ok(AgentEvent::Final(greeting)),
            ]);

            Ok(Box::pin(stream))
        }
    }

    #[tokio::test]
    async fn test_stream_ends_with_final() {
        let agent = GreeterAgent { online: true };
        let context = ExecutionContext::new("plan my day").with_user("dana");

        let events: Vec<AgentEvent> = agent
            .execute(&context)
            .await
            .unwrap()
            .map(|event| event.unwrap())
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert_eq!(
            events.last(),
            Some(&AgentEvent::Final("Hello dana, you asked: plan my day".to_string()))
        );
    }

    #[tokio::test]
    async fn test_offline_agent() {
        let agent = GreeterAgent { online: false };
        assert!(!agent.check_availability().await);

        let result = agent.execute(&ExecutionContext::new("x")).await;
        assert!(matches!(result, Err(AgentError::NotAvailable(_))));
    }

    #[test]
    fn test_context_builders_override_defaults() {
        let session = Uuid::new_v4();
        let context = ExecutionContext::new("call mom")
            .with_user("cli_user")
            .with_session(session)
            .with_project_path("/srv/smarttask");

        assert_eq!(context.user_id, "cli_user");
        assert_eq!(context.session_id, session);
        assert_eq!(context.project_path, "/srv/smarttask");

        let fresh = ExecutionContext::new("call mom");
        assert_eq!(fresh.user_id, "default_user");
        assert_ne!(fresh.session_id, session);
        assert!(!fresh.project_path.is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AgentError::ApiError("quota".to_string()).to_string(),
            "API call failed: quota"
        );
        assert_eq!(
            AgentError::ExecutionError("exit 1".to_string()).to_string(),
            "Execution failed: exit 1"
        );
    }
}
