//! Agent definition models for `.smarttask/agents/*.md`.
//!
//! Agents are defined as Markdown files with YAML front matter. The front
//! matter carries metadata and the allowed tool list; the body is the
//! agent's instruction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named agent capability and its instruction.
///
/// # Example
///
/// ```markdown
/// ---
/// name: goal_planning_agent
/// description: Specialized in long-term goal planning and strategy
/// model: gemini-2.0-flash
/// tools:
///   - save_long_term_goal
///   - list_long_term_goals
///   - get_current_time
/// ---
///
/// You are the Goal Planning specialist. ...
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct AgentDefinition {
    /// Unique name, used as the routing target and the A2A address.
    pub name: String,

    /// Human-readable description of the agent's purpose.
    pub description: String,

    /// Model identifier handed to the external CLI.
    #[serde(default)]
    pub model: String,

    /// External CLI program that executes this agent.
    ///
    /// When absent the agent runs as an offline echo agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Extra arguments passed to `command` before the prompt.
    #[serde(default)]
    pub args: Vec<String>,

    /// Tool names this agent may call.
    #[serde(default)]
    pub tools: Vec<String>,

    /// The Markdown body of the definition file.
    ///
    /// Not part of the front matter, so it is skipped by serde.
    #[serde(skip)]
    pub instruction: String,
}
