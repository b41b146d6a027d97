//! Configuration file loader for the `.smarttask/` directory structure.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use crate::config::CONFIG_DIR;
use crate::init::templates::{get_template, list_templates};
use crate::orchestrator::RoutingTable;
use crate::store::TOOL_NAMES;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use st_protocol::{AgentDefinition, GlobalConfig, RoutingConfig};
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Loads all configuration from the `.smarttask/` directory under `root`.
///
/// A missing directory, a missing file or an empty `agents/` directory
/// falls back to the built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - Agent names repeat, an agent lists an unknown tool, or a routing
///   rule names an agent that is not defined
///
/// # Example
///
/// ```rust,no_run
/// use st_core::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} agents", config.agents.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let st_dir = root.join(CONFIG_DIR);

    if !st_dir.exists() {
        return Ok(AppConfig {
            global: GlobalConfig::default(),
            agents: builtin_agents()?,
            routing: RoutingTable::builtin_config(),
        });
    }

    let config = AppConfig {
        global: load_global_config(&st_dir)?,
        agents: load_agents(&st_dir)?,
        routing: load_routing(&st_dir)?,
    };
    validate(&st_dir, &config)?;

    Ok(config)
}

/// The agent definitions shipped in the embedded templates.
pub fn builtin_agents() -> ConfigResult<Vec<AgentDefinition>> {
    list_templates("agents/")
        .into_iter()
        .map(|path| {
            let content = get_template(&path).unwrap_or_default();
            parse_agent_definition(Path::new(&path), &content)
        })
        .collect()
}

/// Parse one Markdown agent definition. `path` is only used in errors.
pub fn parse_agent_definition(path: &Path, content: &str) -> ConfigResult<AgentDefinition> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(content);

    let mut agent: AgentDefinition = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {e}"),
        })?;

    agent.instruction = result.content.trim().to_string();
    Ok(agent)
}

fn load_global_config(st_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = st_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

fn load_agents(st_dir: &Path) -> ConfigResult<Vec<AgentDefinition>> {
    let agents_dir = st_dir.join("agents");

    if !agents_dir.exists() {
        return builtin_agents();
    }

    let mut agents = Vec::new();

    for entry in WalkDir::new(&agents_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: agents_dir.clone(),
            source,
        })?;

        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        agents.push(parse_agent_definition(path, &content)?);
    }

    if agents.is_empty() {
        return builtin_agents();
    }

    Ok(agents)
}

fn load_routing(st_dir: &Path) -> ConfigResult<RoutingConfig> {
    let routing_path = st_dir.join("routing.yaml");

    if !routing_path.exists() {
        return Ok(RoutingTable::builtin_config());
    }

    let content =
        std::fs::read_to_string(&routing_path).map_err(|source| ConfigError::FileRead {
            path: routing_path.clone(),
            source,
        })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: routing_path,
        source,
    })
}

fn validate(st_dir: &Path, config: &AppConfig) -> ConfigResult<()> {
    let agents_dir = st_dir.join("agents");
    let mut names = HashSet::new();

    for agent in &config.agents {
        if !names.insert(agent.name.as_str()) {
            return Err(ConfigError::InvalidConfig {
                path: agents_dir,
                reason: format!("Agent '{}' is defined more than once", agent.name),
            });
        }
        if let Some(tool) = agent.tools.iter().find(|t| !TOOL_NAMES.contains(&t.as_str())) {
            return Err(ConfigError::InvalidConfig {
                path: agents_dir,
                reason: format!("Agent '{}' lists unknown tool '{tool}'", agent.name),
            });
        }
    }

    let table = RoutingTable::from(config.routing.clone());
    if let Some(missing) = table.agents().into_iter().find(|name| !names.contains(name)) {
        return Err(ConfigError::InvalidConfig {
            path: st_dir.join("routing.yaml"),
            reason: format!("Routing refers to undefined agent '{missing}'"),
        });
    }

    Ok(())
}
