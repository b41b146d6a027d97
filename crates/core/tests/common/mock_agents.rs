//! Scripted agents for deterministic workflow tests.

use async_trait::async_trait;
use st_core::agents::{Agent, AgentError, AgentEvent, AgentStream, ExecutionContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Streams a few chunks and then a fixed final response.
#[allow(dead_code)]
pub struct MockSuccessAgent {
    pub response: String,
}

impl MockSuccessAgent {
    #[allow(dead_code)]
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

#[async_trait]
impl Agent for MockSuccessAgent {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        let response = self.response.clone();
        let instruction = context.instruction.clone();

        let stream = async_stream::stream! {
            yield Ok(AgentEvent::Thought(format!("Reading: {instruction}")));
            yield Ok(AgentEvent::MessageChunk(response.clone()));
            yield Ok(AgentEvent::Final(response));
        };

        Ok(Box::pin(stream))
    }
}

/// Fails mid-stream after emitting a thought.
#[allow(dead_code)]
pub struct MockFailureAgent {
    pub error_message: String,
}

impl MockFailureAgent {
    #[allow(dead_code)]
    pub fn new(error_message: &str) -> Self {
        Self {
            error_message: error_message.to_string(),
        }
    }
}

#[async_trait]
impl Agent for MockFailureAgent {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, _context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        let error_message = self.error_message.clone();

        let stream = async_stream::stream! {
            yield Ok(AgentEvent::Thought("Working...".to_string()));
            yield Err(AgentError::ApiError(error_message));
        };

        Ok(Box::pin(stream))
    }
}

/// Sleeps before answering.
#[allow(dead_code)]
pub struct MockDelayedAgent {
    pub response: String,
    pub delay: Duration,
}

impl MockDelayedAgent {
    #[allow(dead_code)]
    pub fn new(response: &str, delay: Duration) -> Self {
        Self {
            response: response.to_string(),
            delay,
        }
    }
}

#[async_trait]
impl Agent for MockDelayedAgent {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, _context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        let response = self.response.clone();
        let delay = self.delay;

        let stream = async_stream::stream! {
            tokio::time::sleep(delay).await;
            yield Ok(AgentEvent::Final(response));
        };

        Ok(Box::pin(stream))
    }
}

/// Counts executions and records the last context it saw.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingAgent {
    pub calls: AtomicUsize,
    pub last_context: parking_lot::Mutex<Option<ExecutionContext>>,
}

impl RecordingAgent {
    #[allow(dead_code)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock() = Some(context.clone());
        let reply = format!("recorded: {}", context.instruction);

        let stream = async_stream::stream! {
            yield Ok(AgentEvent::Final(reply));
        };

        Ok(Box::pin(stream))
    }
}
