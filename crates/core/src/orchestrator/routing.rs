//! Keyword routing between the standard agents.

use crate::agents::AgentKind;
use st_protocol::{PrimaryRule, RoutingConfig, SecondaryRule};

/// Ordered keyword rules deciding which agents handle a request.
///
/// Matching is case-insensitive substring search over the lower-cased
/// input (and, for secondary rules, the primary response). The first
/// matching rule wins.
///
/// # Examples
///
/// ```
/// use st_core::orchestrator::RoutingTable;
///
/// let table = RoutingTable::default();
/// assert_eq!(table.route("What's my long-term STRATEGY?"), "goal_planning_agent");
/// assert_eq!(table.route("show weekly stats"), "analysis_agent");
/// assert_eq!(table.route("buy milk tomorrow"), "task_manager_agent");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
    default_agent: String,
    primary: Vec<PrimaryRule>,
    secondary: Vec<SecondaryRule>,
}

impl RoutingTable {
    /// Built-in rules for the three standard agents.
    pub fn builtin_config() -> RoutingConfig {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();

        RoutingConfig {
            default_agent: AgentKind::TaskManager.name().to_string(),
            primary: vec![
                PrimaryRule {
                    agent: AgentKind::GoalPlanning.name().to_string(),
                    keywords: words(&["goal", "long-term", "strategy", "plan", "vision"]),
                },
                PrimaryRule {
                    agent: AgentKind::Analysis.name().to_string(),
                    keywords: words(&["report", "analysis", "stats", "trend", "progress"]),
                },
            ],
            secondary: vec![
                SecondaryRule {
                    agent: AgentKind::GoalPlanning.name().to_string(),
                    input_keywords: words(&["goal"]),
                    response_keywords: words(&["task"]),
                },
                SecondaryRule {
                    agent: AgentKind::Analysis.name().to_string(),
                    input_keywords: vec![],
                    response_keywords: words(&["report", "analysis"]),
                },
            ],
        }
    }

    /// Primary agent for `input`.
    pub fn route(&self, input: &str) -> &str {
        let input = input.to_lowercase();
        self.primary
            .iter()
            .find(|rule| contains_any(&input, &rule.keywords))
            .map(|rule| rule.agent.as_str())
            .unwrap_or(&self.default_agent)
    }

    /// Secondary agent to involve after the primary answered `response`.
    ///
    /// May name the primary agent itself.
    pub fn secondary_for(&self, input: &str, response: &str) -> Option<&str> {
        let input = input.to_lowercase();
        let response = response.to_lowercase();
        self.secondary
            .iter()
            .find(|rule| {
                (rule.input_keywords.is_empty() || contains_any(&input, &rule.input_keywords))
                    && (rule.response_keywords.is_empty()
                        || contains_any(&response, &rule.response_keywords))
            })
            .map(|rule| rule.agent.as_str())
    }

    pub fn default_agent(&self) -> &str {
        &self.default_agent
    }

    /// Every agent name the table can route to, deduplicated, in rule order.
    pub fn agents(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![self.default_agent.as_str()];
        let rules = self
            .primary
            .iter()
            .map(|r| r.agent.as_str())
            .chain(self.secondary.iter().map(|r| r.agent.as_str()));
        for name in rules {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::from(Self::builtin_config())
    }
}

impl From<RoutingConfig> for RoutingTable {
    fn from(config: RoutingConfig) -> Self {
        let lower = |words: Vec<String>| words.into_iter().map(|w| w.to_lowercase()).collect();

        Self {
            default_agent: config.default_agent,
            primary: config
                .primary
                .into_iter()
                .map(|rule| PrimaryRule {
                    agent: rule.agent,
                    keywords: lower(rule.keywords),
                })
                .collect(),
            secondary: config
                .secondary
                .into_iter()
                .map(|rule| SecondaryRule {
                    agent: rule.agent,
                    input_keywords: lower(rule.input_keywords),
                    response_keywords: lower(rule.response_keywords),
                })
                .collect(),
        }
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}
