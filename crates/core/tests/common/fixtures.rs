//! Test fixtures: project directories, stores and agent definitions.

use st_core::observability::EventTracker;
use st_core::store::{TaskStore, TaskTools};
use st_protocol::AgentDefinition;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// A `TaskTools` over a fresh database inside its own temp directory.
///
/// Keep the returned `TempDir` alive for as long as the tools are used.
#[allow(dead_code)]
pub fn temp_tools() -> (TempDir, TaskTools, Arc<EventTracker>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tracker = Arc::new(EventTracker::default());
    let store = Arc::new(TaskStore::new(dir.path().join("tasks_db.json")));
    let tools = TaskTools::new(store, tracker.clone());
    (dir, tools, tracker)
}

/// Create a project with a `.smarttask/` directory holding `config_toml`,
/// `routing_yaml` (if any) and the given agent files.
#[allow(dead_code)]
pub fn create_test_project(
    config_toml: &str,
    routing_yaml: Option<&str>,
    agents: &[(&str, &str)],
) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let st_dir = dir.path().join(".smarttask");
    fs::create_dir_all(st_dir.join("agents")).expect("Failed to create .smarttask/agents");

    fs::write(st_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");
    if let Some(routing) = routing_yaml {
        fs::write(st_dir.join("routing.yaml"), routing).expect("Failed to write routing.yaml");
    }
    for (file_name, content) in agents {
        fs::write(st_dir.join("agents").join(file_name), content).expect("Failed to write agent file");
    }

    dir
}

/// Markdown agent file with front matter and an instruction body.
///
/// An empty `model` leaves the field out.
#[allow(dead_code)]
pub fn agent_markdown(name: &str, model: &str, tools: &[&str], instruction: &str) -> String {
    let tools = if tools.is_empty() {
        "tools: []\n".to_string()
    } else {
        let items: String = tools.iter().map(|t| format!("  - {t}\n")).collect();
        format!("tools:\n{items}")
    };
    let model = if model.is_empty() {
        String::new()
    } else {
        format!("model: {model}\n")
    };
    format!("---\nname: {name}\ndescription: Test agent {name}\n{model}{tools}---\n\n{instruction}\n")
}

/// In-memory definition for factory and registry tests.
#[allow(dead_code)]
pub fn test_definition(name: &str, model: &str) -> AgentDefinition {
    AgentDefinition {
        name: name.to_string(),
        description: format!("Test agent {name}"),
        model: model.to_string(),
        command: None,
        args: vec![],
        tools: vec![],
        instruction: "You are a test agent.".to_string(),
    }
}

/// Read the raw database file, if it exists.
#[allow(dead_code)]
pub fn read_database(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Poll `condition` every 10ms until it holds, panicking after two seconds.
#[allow(dead_code)]
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(2);
    while !condition() {
        if tokio::time::Instant::now() > deadline {
            panic!("Condition not met within 2 seconds");
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
