//! Agent backed by an external command-line program.
//!
//! The program receives the agent instruction and the user's request as
//! its last argument, and context in `SMARTTASK_*` environment variables.
//! It answers on stdout, one line at a time:
//!
//! ```text
//! {"type": "thought", "content": "Looking at the task list"}
//! {"type": "tool_call", "name": "list_tasks", "args": {"status": "pending"}}
//! {"type": "message", "content": "You have 3 pending tasks."}
//! {"type": "final", "content": "You have 3 pending tasks."}
//! ```
//!
//! Plain text lines count as message chunks. Without a `final` line the
//! response is the concatenated chunks.

use crate::agents::base::{Agent, AgentError, AgentEvent, AgentStream, ExecutionContext};
use crate::agents::cli_executor::{CliCommand, CliExecutor, CliLine};
use crate::store::TaskTools;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use st_protocol::AgentDefinition;
use tokio_stream::StreamExt;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputLine {
    Thought {
        content: String,
    },
    Message {
        content: String,
    },
    ToolCall {
        name: String,
        #[serde(default)]
        args: Value,
    },
    Final {
        content: String,
    },
}

pub struct CommandAgent {
    definition: AgentDefinition,
    tools: Option<TaskTools>,
}

impl CommandAgent {
    pub fn new(definition: AgentDefinition, tools: Option<TaskTools>) -> Result<Self, AgentError> {
        match definition.command.as_deref() {
            Some(program) if !program.trim().is_empty() => Ok(Self { definition, tools }),
            _ => Err(AgentError::NotAvailable(format!(
                "Agent '{}' has no command configured",
                definition.name
            ))),
        }
    }

    fn program(&self) -> &str {
        self.definition.command.as_deref().unwrap_or_default()
    }

    fn build_command(&self, context: &ExecutionContext) -> CliCommand {
        let mut args = self.definition.args.clone();
        if !self.definition.model.is_empty() {
            args.push("--model".to_string());
            args.push(self.definition.model.clone());
        }
        args.push(format!(
            "{}\n\nUser request:\n{}",
            self.definition.instruction.trim(),
            context.instruction
        ));

        CliCommand {
            program: self.program().to_string(),
            args,
            envs: vec![
                ("SMARTTASK_AGENT".to_string(), self.definition.name.clone()),
                ("SMARTTASK_USER_ID".to_string(), context.user_id.clone()),
                ("SMARTTASK_SESSION_ID".to_string(), context.session_id.to_string()),
                ("SMARTTASK_TOOLS".to_string(), self.definition.tools.join(",")),
            ],
            working_dir: context.project_path.clone(),
        }
    }
}

#[async_trait]
impl Agent for CommandAgent {
    async fn check_availability(&self) -> bool {
        which::which(self.program()).is_ok()
    }

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentStream, AgentError> {
        let mut lines = CliExecutor::execute(self.build_command(context));
        let tools = self.tools.clone();
        let allowed = self.definition.tools.clone();
        let agent_name = self.definition.name.clone();

        let stream = async_stream::stream! {
            let mut collected = String::new();
            let mut finished = false;

            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let output = match line {
                    CliLine::Text(text) => {
                        collected.push_str(&text);
                        collected.push('\n');
                        yield Ok(AgentEvent::MessageChunk(text));
                        continue;
                    }
                    CliLine::Json(map) => serde_json::from_value::<OutputLine>(Value::Object(map)),
                };

                match output {
                    Ok(OutputLine::Thought { content }) => yield Ok(AgentEvent::Thought(content)),
                    Ok(OutputLine::Message { content }) => {
                        collected.push_str(&content);
                        yield Ok(AgentEvent::MessageChunk(content));
                    }
                    Ok(OutputLine::ToolCall { name, args }) => {
                        let summary = if !allowed.iter().any(|t| t == &name) {
                            format!("{name} -> rejected: not allowed for {agent_name}")
                        } else if let Some(tools) = &tools {
                            let result = tools.invoke(&name, args).await;
                            let body = serde_json::to_string(&result).unwrap_or_else(|e| e.to_string());
                            format!("{name} -> {body}")
                        } else {
                            format!("{name} -> rejected: no tools available")
                        };
                        yield Ok(AgentEvent::ToolCall(summary));
                    }
                    Ok(OutputLine::Final { content }) => {
                        finished = true;
                        yield Ok(AgentEvent::Final(content));
                    }
                    Err(e) => {
                        yield Err(AgentError::StreamParseError(format!("Unrecognized output line: {e}")));
                        return;
                    }
                }
            }

            if !finished {
                yield Ok(AgentEvent::Final(collected.trim().to_string()));
            }
        };

        Ok(Box::pin(stream))
    }
}
