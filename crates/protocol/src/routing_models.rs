//! Keyword routing rules for `.smarttask/routing.yaml`.
//!
//! The orchestrator picks a primary agent with the first matching primary
//! rule (falling back to `default-agent`), then decides on a secondary agent
//! with the first matching secondary rule.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Complete routing configuration.
///
/// # Example
///
/// ```yaml
/// default-agent: task_manager_agent
/// primary:
///   - agent: goal_planning_agent
///     keywords: [goal, long-term, strategy, plan, vision]
/// secondary:
///   - agent: goal_planning_agent
///     input-keywords: [goal]
///     response-keywords: [task]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingConfig {
    /// Agent used when no primary rule matches.
    pub default_agent: String,

    /// Ordered primary rules. First match wins.
    #[serde(default)]
    pub primary: Vec<PrimaryRule>,

    /// Ordered secondary rules. First match wins.
    #[serde(default)]
    pub secondary: Vec<SecondaryRule>,
}

/// Routes to `agent` when the lower-cased input contains any keyword.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct PrimaryRule {
    pub agent: String,
    pub keywords: Vec<String>,
}

/// Involves `agent` after the primary run.
///
/// Both keyword groups must match when non-empty: the input must contain
/// any of `input-keywords` and the primary response must contain any of
/// `response-keywords`. An empty group always matches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct SecondaryRule {
    pub agent: String,
    #[serde(default)]
    pub input_keywords: Vec<String>,
    #[serde(default)]
    pub response_keywords: Vec<String>,
}
