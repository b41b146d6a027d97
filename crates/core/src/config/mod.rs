//! Configuration loading.
//!
//! Reads the `.smarttask/` directory of a project:
//! - `config.toml`: global settings
//! - `agents/*.md`: agent definitions with YAML front matter
//! - `routing.yaml`: keyword routing rules
//!
//! Anything missing falls back to the built-in defaults shipped in the
//! embedded templates.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::{builtin_agents, load_config, parse_agent_definition};
pub use models::AppConfig;

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".smarttask";
