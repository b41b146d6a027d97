//! Agent adapter implementations.

pub mod command_agent;
pub mod mock_agent;

pub use command_agent::CommandAgent;
pub use mock_agent::MockAgent;
