//! Agent abstraction and management.
//!
//! This module provides the `Agent` trait (Adapter Pattern), the adapters
//! behind it and the `AgentRegistry` the orchestrator routes into.

pub mod adapters;
pub mod base;
pub mod cli_executor;
pub mod factory;
pub mod kind;
pub mod registry;
pub mod session;

pub use adapters::{CommandAgent, MockAgent};
pub use base::{Agent, AgentError, AgentEvent, AgentStream, ExecutionContext};
pub use factory::AgentFactory;
pub use kind::AgentKind;
pub use registry::AgentRegistry;
pub use session::{Session, SessionService};
