//! Embedded template files for `.smarttask/` initialization.
//!
//! The workspace `templates/` directory is embedded into the binary with
//! `rust-embed`. The same files are the built-in configuration used when a
//! project has no `.smarttask/` directory.

use rust_embed::RustEmbed;

/// Files under the workspace `templates/` directory, embedded in debug
/// builds too (`debug-embed`).
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path relative to the templates root.
///
/// # Example
/// ```
/// use st_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("event_capacity"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// Template paths starting with `prefix`, sorted.
///
/// # Example
/// ```
/// use st_core::init::templates::list_templates;
///
/// let agents = list_templates("agents/");
/// assert!(agents.contains(&"agents/analysis_agent.md".to_string()));
/// ```
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_template() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        assert!(content.contains("data_file = \"tasks_db.json\""));
        assert!(content.contains("[bus]"));
    }

    #[test]
    fn test_get_routing_template() {
        let content = get_template("routing.yaml").expect("routing.yaml should be embedded");
        assert!(content.contains("default-agent: task_manager_agent"));
    }

    #[test]
    fn test_get_agent_templates() {
        for name in ["task_manager_agent", "goal_planning_agent", "analysis_agent"] {
            let content = get_template(&format!("agents/{name}.md"))
                .unwrap_or_else(|| panic!("agents/{name}.md should be embedded"));
            assert!(content.contains(&format!("name: {name}")));
        }
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_list_templates() {
        assert_eq!(
            list_templates("agents/"),
            vec![
                "agents/analysis_agent.md",
                "agents/goal_planning_agent.md",
                "agents/task_manager_agent.md",
            ]
        );
        assert_eq!(list_templates("").len(), 5);
    }
}
