//! Message handler trait and the per-agent handler registry.

use crate::a2a::error::HandlerError;
use async_trait::async_trait;
use parking_lot::RwLock;
use st_protocol::A2AMessage;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Processes inbound A2A messages addressed to one agent.
///
/// The message is lent for the duration of the call. Returning `Ok` marks
/// it delivered.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: &A2AMessage) -> Result<(), HandlerError>;
}

pub type BoxedHandler = Arc<dyn MessageHandler>;

/// Adapter turning an async closure into a [`MessageHandler`].
///
/// The closure receives its own copy of the message.
struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(A2AMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, message: &A2AMessage) -> Result<(), HandlerError> {
        (self.0)(message.clone()).await
    }
}

/// Wrap an async closure as a handler.
///
/// ```
/// use st_core::a2a::handler_fn;
///
/// let handler = handler_fn(|message| async move {
///     println!("got {}", message.message_type);
///     Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(A2AMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// Agent name to handler mapping. Registration is last-write-wins.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, BoxedHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for the same name.
    pub fn register(&self, agent_name: impl Into<String>, handler: BoxedHandler) {
        self.handlers.write().insert(agent_name.into(), handler);
    }

    /// Look up a handler. The lock is released before the caller awaits it.
    pub fn get(&self, agent_name: &str) -> Option<BoxedHandler> {
        self.handlers.read().get(agent_name).cloned()
    }

    pub fn contains(&self, agent_name: &str) -> bool {
        self.handlers.read().contains_key(agent_name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }
}
