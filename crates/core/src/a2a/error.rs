//! Error types for the message bus and its handlers.

use thiserror::Error;

/// Misuse of the bus API or a closed queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The queue is at capacity and the overflow policy drops new messages.
    #[error("Message queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// The consumer side has been dropped.
    #[error("Message bus is closed")]
    Closed,

    /// The processing loop has already been started on this bus.
    #[error("Message processor is already running")]
    AlreadyRunning,
}

/// Failure inside a message handler.
///
/// Caught by the bus loop, logged as `message_processing_error`, and the
/// message is dropped.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Missing field '{0}' in message content")]
    MissingField(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Tool call failed: {0}")]
    Tool(String),

    #[error("Failed to send reply: {0}")]
    Reply(#[from] BusError),

    #[error("{0}")]
    Other(String),
}
