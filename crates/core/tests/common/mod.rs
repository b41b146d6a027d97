//! Common test utilities shared by the integration tests.
//!
//! - Project and store fixtures
//! - Event assertions
//! - Scripted mock agents

pub mod assertions;
pub mod fixtures;
pub mod mock_agents;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_agents::*;
