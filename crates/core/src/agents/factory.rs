//! Agent factory for creating agent instances from definitions.

use crate::agents::adapters::{CommandAgent, MockAgent};
use crate::agents::base::Agent;
use crate::store::TaskTools;
use anyhow::{bail, Result};
use st_protocol::AgentDefinition;
use std::sync::Arc;

/// Factory for creating agent instances based on configuration.
pub struct AgentFactory;

impl AgentFactory {
    /// Create an agent instance from a definition.
    ///
    /// # Behavior
    ///
    /// - A definition with a `command` becomes a [`CommandAgent`] that can
    ///   call the task tools listed in the definition.
    /// - Without a command the agent is a [`MockAgent`]. The model name picks
    ///   the script: `mock-failure` fails mid-stream, `mock-unavailable`
    ///   reports itself unavailable and anything else echoes the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use st_core::agents::AgentFactory;
    /// use st_protocol::AgentDefinition;
    ///
    /// let definition = AgentDefinition {
    ///     name: "analysis_agent".to_string(),
    ///     description: "Analysis".to_string(),
    ///     model: String::new(),
    ///     command: None,
    ///     args: vec![],
    ///     tools: vec!["list_tasks".to_string()],
    ///     instruction: "You analyse tasks.".to_string(),
    /// };
    ///
    /// let agent = AgentFactory::create(&definition, None).unwrap();
    /// ```
    pub fn create(definition: &AgentDefinition, tools: Option<TaskTools>) -> Result<Arc<dyn Agent>> {
        match definition.command.as_deref() {
            Some(command) if command.trim().is_empty() => {
                bail!("Agent '{}' has an empty command", definition.name)
            }
            Some(_) => Ok(Arc::new(CommandAgent::new(definition.clone(), tools)?)),
            None => Ok(Arc::new(match definition.model.as_str() {
                "mock-failure" => MockAgent::failing(),
                "mock-unavailable" => MockAgent::unavailable(),
                _ => MockAgent::echo(definition.name.clone()),
            })),
        }
    }
}
