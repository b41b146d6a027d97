//! Name → agent mapping used by the orchestrator.
//!
//! The registry is fixed once built; routing to a name it does not hold is
//! an error for the caller to report.

use crate::agents::base::{Agent, AgentError, AgentStream, ExecutionContext};
use crate::agents::factory::AgentFactory;
use crate::store::TaskTools;
use st_protocol::AgentDefinition;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one agent per definition through [`AgentFactory`].
    ///
    /// Every agent receives the same tool handle; command agents restrict
    /// themselves to the tools their definition lists.
    pub fn from_definitions(
        definitions: &[AgentDefinition],
        tools: Option<TaskTools>,
    ) -> anyhow::Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            let agent = AgentFactory::create(definition, tools.clone())?;
            registry.insert(definition.name.clone(), agent);
        }
        Ok(registry)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_agent(mut self, name: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        self.insert(name, agent);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, agent: Arc<dyn Agent>) {
        self.agents.insert(name.into(), agent);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Registered agent names, sorted.
    pub fn list_agents(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up `name`, check that it is available and start it.
    pub async fn execute(
        &self,
        name: &str,
        context: &ExecutionContext,
    ) -> Result<AgentStream, AgentError> {
        let agent = self.get(name).ok_or_else(|| {
            AgentError::NotAvailable(format!("Agent '{name}' not found in registry"))
        })?;

        if !agent.check_availability().await {
            return Err(AgentError::NotAvailable(format!(
                "Agent '{name}' is not available"
            )));
        }

        agent.execute(context).await
    }
}
