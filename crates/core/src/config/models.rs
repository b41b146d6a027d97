//! The aggregated project configuration.

use st_protocol::{AgentDefinition, GlobalConfig, RoutingConfig};
use std::path::{Path, PathBuf};

/// Unified application configuration loaded from `.smarttask/`.
///
/// # Example
///
/// ```rust,no_run
/// use st_core::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} agents, default agent {}",
///          config.agents.len(),
///          config.routing.default_agent);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Agent definitions from `agents/*.md`, sorted by file name.
    pub agents: Vec<AgentDefinition>,

    /// Routing rules from `routing.yaml`.
    pub routing: RoutingConfig,
}

impl AppConfig {
    /// Location of the task database for a project rooted at `root`.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        let data_file = Path::new(&self.global.data_file);
        if data_file.is_absolute() {
            data_file.to_path_buf()
        } else {
            root.join(data_file)
        }
    }

    pub fn agent(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|agent| agent.name == name)
    }
}
