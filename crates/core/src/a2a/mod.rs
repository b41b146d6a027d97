//! In-process agent-to-agent (A2A) messaging.
//!
//! The [`MessageBus`] is a bounded FIFO queue with a single background
//! consumer that dispatches each message to the handler registered for its
//! recipient. Delivery is at-most-once and non-durable; `send` never waits
//! for delivery.

pub mod bus;
pub mod error;
pub mod handler;
pub mod handlers;

pub use bus::{MessageBus, Outbox, A2A_PROTOCOL_SOURCE};
pub use error::{BusError, HandlerError};
pub use handler::{handler_fn, BoxedHandler, HandlerRegistry, MessageHandler};
pub use handlers::register_default_handlers;
