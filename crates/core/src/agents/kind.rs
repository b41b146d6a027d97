//! The three standard agents and the tools each may call.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    TaskManager,
    GoalPlanning,
    Analysis,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [Self::TaskManager, Self::GoalPlanning, Self::Analysis];

    /// Routing target and A2A address of the agent.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskManager => "task_manager_agent",
            Self::GoalPlanning => "goal_planning_agent",
            Self::Analysis => "analysis_agent",
        }
    }

    /// Look up a standard agent by its name.
    ///
    /// # Examples
    ///
    /// ```
    /// use st_core::agents::AgentKind;
    ///
    /// assert_eq!(AgentKind::from_name("analysis_agent"), Some(AgentKind::Analysis));
    /// assert_eq!(AgentKind::from_name("unknown"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::TaskManager => "Main agent for managing tasks, deadlines, and priorities",
            Self::GoalPlanning => "Specialized in long-term goal planning and strategy",
            Self::Analysis => "Specialized in data analysis, reporting, and insights",
        }
    }

    /// Tool names the agent may call.
    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            Self::TaskManager => &[
                "add_task",
                "list_tasks",
                "update_task",
                "update_task_status",
                "delete_task",
                "add_subtasks",
                "mark_subtask_done",
                "list_high_priority_top_n",
                "delete_previous_month_tasks",
            ],
            Self::GoalPlanning => &["save_long_term_goal", "list_long_term_goals", "get_current_time"],
            Self::Analysis => &["list_tasks", "list_long_term_goals", "get_current_time"],
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TOOL_NAMES;

    #[test]
    fn test_names_round_trip() {
        for kind in AgentKind::ALL {
            assert_eq!(AgentKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_tools_are_known() {
        for kind in AgentKind::ALL {
            for tool in kind.tools() {
                assert!(TOOL_NAMES.contains(tool), "{kind} lists unknown tool {tool}");
            }
        }
    }

    #[test]
    fn test_tool_sets() {
        assert_eq!(AgentKind::TaskManager.tools().len(), 9);
        assert!(AgentKind::Analysis.tools().contains(&"list_tasks"));
        assert!(!AgentKind::GoalPlanning.tools().contains(&"delete_task"));
    }
}
