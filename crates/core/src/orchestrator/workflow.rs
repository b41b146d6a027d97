//! Phase tracking for a single `execute_workflow` call.

use crate::observability::elapsed_ms;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Marker used in `agents_involved` when no secondary agent ran.
pub const NO_SECONDARY: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Routing,
    PrimaryRunning,
    SecondaryRunning,
    Done,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Routing => "routing",
            Self::PrimaryRunning => "primary_running",
            Self::SecondaryRunning => "secondary_running",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// One workflow in flight.
#[derive(Debug)]
pub struct WorkflowRun {
    pub id: Uuid,
    phase: WorkflowPhase,
    primary: Option<String>,
    secondary: Option<String>,
    started_at: Instant,
}

impl WorkflowRun {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: WorkflowPhase::Routing,
            primary: None,
            secondary: None,
            started_at: Instant::now(),
        }
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn start_primary(&mut self, agent: &str) {
        self.primary = Some(agent.to_string());
        self.transition(WorkflowPhase::PrimaryRunning);
    }

    pub fn start_secondary(&mut self, agent: &str) {
        self.secondary = Some(agent.to_string());
        self.transition(WorkflowPhase::SecondaryRunning);
    }

    pub fn finish(&mut self) {
        self.transition(WorkflowPhase::Done);
    }

    /// `[primary, secondary]`, with [`NO_SECONDARY`] in place of a missing
    /// secondary agent.
    pub fn agents_involved(&self) -> Vec<String> {
        vec![
            self.primary.clone().unwrap_or_default(),
            self.secondary
                .clone()
                .unwrap_or_else(|| NO_SECONDARY.to_string()),
        ]
    }

    pub fn elapsed_ms(&self) -> f64 {
        elapsed_ms(self.started_at)
    }

    fn transition(&mut self, to: WorkflowPhase) {
        tracing::debug!(workflow = %self.id, from = %self.phase, to = %to, "workflow phase");
        self.phase = to;
    }
}

impl Default for WorkflowRun {
    fn default() -> Self {
        Self::new()
    }
}
