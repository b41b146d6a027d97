//! Mock agent implementation for tests and offline use.

use crate::agents::base::{Agent, AgentError, AgentEvent, AgentStream, ExecutionContext};
use async_trait::async_trait;

#[derive(Clone)]
enum Script {
    Events(Vec<Result<AgentEvent, AgentError>>),
    /// Answer with the agent name and the user's input.
    Echo(String),
}

#[derive(Clone)]
pub struct MockAgent {
    available: bool,
    script: Script,
}

impl MockAgent {
    pub fn new(available: bool, events: Vec<Result<AgentEvent, AgentError>>) -> Self {
        Self {
            available,
            script: Script::Events(events),
        }
    }

    pub fn success() -> Self {
        Self::responding("Mock response")
    }

    /// Thinks once, then answers with `response`.
    pub fn responding(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::new(
            true,
            vec![
                Ok(AgentEvent::Thought("Mock agent thinking".to_string())),
                Ok(AgentEvent::MessageChunk(response.clone())),
                Ok(AgentEvent::Final(response)),
            ],
        )
    }

    /// Answers `[<name>] <input>`.
    pub fn echo(name: impl Into<String>) -> Self {
        Self {
            available: true,
            script: Script::Echo(name.into()),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(false, vec![])
    }

    pub fn failing() -> Self {
        Self::new(
            true,
            vec![
                Ok(AgentEvent::Thought("Starting...".to_string())),
                Err(AgentError::ExecutionError("Mock failure".to_string())),
            ],
        )
    }
}

#[async_trait]
impl Agent for MockAgent {
    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        if !self.available {
            return Err(AgentError::NotAvailable("Mock agent not available".to_string()));
        }

        let events = match &self.script {
            Script::Events(events) => events.clone(),
            Script::Echo(name) => vec![Ok(AgentEvent::Final(format!("[{name}] {}", context.instruction)))],
        };
        Ok(Box::pin(tokio_stream::iter(events)))
    }
}
