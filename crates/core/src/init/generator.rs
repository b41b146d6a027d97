//! Directory structure and file generation for `.smarttask/` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .smarttask directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .smarttask will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing .smarttask directory.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Generate a `.smarttask/` directory from the embedded templates.
///
/// ```text
/// .smarttask/
/// ├── config.toml
/// ├── routing.yaml
/// └── agents/
///     ├── analysis_agent.md
///     ├── goal_planning_agent.md
///     └── task_manager_agent.md
/// ```
///
/// Returns the written file paths. Files not produced by a template are
/// left alone when `force` is set.
pub async fn generate_smarttask_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let st_dir = options.target_dir.join(CONFIG_DIR);

    if st_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(st_dir));
    }

    fs::create_dir_all(st_dir.join("agents")).map_err(|source| InitError::DirectoryCreate {
        path: st_dir.join("agents"),
        source,
    })?;

    let mut written = vec![
        write_template_file(&st_dir, "config.toml")?,
        write_template_file(&st_dir, "routing.yaml")?,
    ];
    for agent_path in list_templates("agents/") {
        written.push(write_template_file(&st_dir, &agent_path)?);
    }

    Ok(written)
}

fn write_template_file(st_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = st_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
