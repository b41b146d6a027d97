//! Wiring of the coordination core for one project.
//!
//! [`SmartTask`] owns the shared event tracker, the task tools, the A2A
//! bus with the built-in handlers, the orchestrator and the chat front
//! door, all built from a loaded [`AppConfig`].

use crate::a2a::{register_default_handlers, MessageBus};
use crate::agents::AgentRegistry;
use crate::chat::ChatService;
use crate::config::{load_config, AppConfig};
use crate::observability::EventTracker;
use crate::orchestrator::{Orchestrator, RoutingTable};
use crate::store::{TaskStore, TaskTools};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct SmartTask {
    config: AppConfig,
    root: PathBuf,
    tracker: Arc<EventTracker>,
    tools: TaskTools,
    bus: Arc<MessageBus>,
    chat: ChatService,
}

impl SmartTask {
    /// Load `.smarttask/` under `root` and build every component.
    pub async fn load(root: &Path) -> Result<Self> {
        let config = load_config(root)
            .await
            .with_context(|| format!("Failed to load configuration from {}", root.display()))?;
        Self::from_config(config, root)
    }

    pub fn from_config(config: AppConfig, root: &Path) -> Result<Self> {
        let tracker = Arc::new(EventTracker::new(config.global.event_capacity));
        let store = Arc::new(TaskStore::new(config.data_path(root)));
        let tools = TaskTools::new(store, tracker.clone());

        let bus = Arc::new(MessageBus::new(tracker.clone(), &config.global.bus));
        register_default_handlers(&bus, &tools);

        let registry = AgentRegistry::from_definitions(&config.agents, Some(tools.clone()))
            .context("Failed to create agents")?;
        let orchestrator = Orchestrator::new(registry, tracker.clone())
            .with_routing(RoutingTable::from(config.routing.clone()))
            .with_project_path(root.display().to_string());
        let chat = ChatService::new(tools.clone(), Arc::new(orchestrator));

        tracing::debug!(
            root = %root.display(),
            agents = config.agents.len(),
            data_file = %config.data_path(root).display(),
            "smarttask ready"
        );

        Ok(Self {
            config,
            root: root.to_path_buf(),
            tracker,
            tools,
            bus,
            chat,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tracker(&self) -> &Arc<EventTracker> {
        &self.tracker
    }

    pub fn tools(&self) -> &TaskTools {
        &self.tools
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        self.chat.orchestrator()
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }
}
