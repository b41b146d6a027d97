//! Subprocess executor for command-line agents.
//!
//! Spawns an external program and streams its stdout line by line. Lines
//! holding a JSON object are parsed; anything else is passed through as
//! plain text.

use crate::agents::base::AgentError;
use serde_json::Value;
use std::pin::Pin;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio_stream::Stream;

/// Maximum number of stderr bytes quoted in a failure message.
const STDERR_TAIL: usize = 500;

/// One non-empty line of subprocess output.
#[derive(Debug, Clone, PartialEq)]
pub enum CliLine {
    Json(serde_json::Map<String, Value>),
    Text(String),
}

/// Command line to spawn.
#[derive(Debug, Clone, Default)]
pub struct CliCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub working_dir: String,
}

pub struct CliExecutor;

impl CliExecutor {
    /// Spawn `command` and stream its stdout.
    ///
    /// Empty lines are skipped. A non-zero exit status yields a final
    /// `AgentError::ExecutionError` quoting the tail of stderr.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use st_core::agents::cli_executor::{CliCommand, CliExecutor};
    /// use tokio_stream::StreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let stream = CliExecutor::execute(CliCommand {
    ///         program: "echo".to_string(),
    ///         args: vec![r#"{"type":"final","content":"hi"}"#.to_string()],
    ///         working_dir: ".".to_string(),
    ///         ..Default::default()
    ///     });
    ///
    ///     let lines: Vec<_> = stream.collect().await;
    ///     println!("Got {} lines", lines.len());
    /// }
    /// ```
    pub fn execute(
        command: CliCommand,
    ) -> Pin<Box<dyn Stream<Item = Result<CliLine, AgentError>> + Send>> {
        let stream = async_stream::stream! {
            let mut cmd = Command::new(&command.program);
            cmd.args(&command.args);
            cmd.envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            cmd.current_dir(&command.working_dir);
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
            cmd.kill_on_drop(true);

            let mut child = match cmd.spawn() {
                Ok(child) => child,
                Err(e) => {
                    yield Err(AgentError::ExecutionError(format!(
                        "Failed to spawn command '{}': {e}",
                        command.program
                    )));
                    return;
                }
            };

            let Some(stdout) = child.stdout.take() else {
                yield Err(AgentError::ExecutionError("Failed to capture stdout".to_string()));
                return;
            };

            // Drain stderr concurrently so a chatty child cannot block on a full pipe.
            let stderr_task = child.stderr.take().map(|mut stderr| {
                tokio::spawn(async move {
                    let mut buf = String::new();
                    let _ = stderr.read_to_string(&mut buf).await;
                    buf
                })
            });

            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        yield Ok(parse_line(line));
                    }
                    Ok(None) => break,
                    Err(e) => {
                        yield Err(AgentError::StreamParseError(e.to_string()));
                        break;
                    }
                }
            }

            let status = child.wait().await;
            let stderr = match stderr_task {
                Some(task) => task.await.unwrap_or_default(),
                None => String::new(),
            };

            match status {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    yield Err(AgentError::ExecutionError(format!(
                        "'{}' exited with {status}: {}",
                        command.program,
                        tail(&stderr)
                    )));
                }
                Err(e) => {
                    yield Err(AgentError::ExecutionError(format!(
                        "Failed to wait for '{}': {e}",
                        command.program
                    )));
                }
            }
        };

        Box::pin(stream)
    }
}

fn parse_line(line: String) -> CliLine {
    match serde_json::from_str::<Value>(&line) {
        Ok(Value::Object(map)) => CliLine::Json(map),
        _ => CliLine::Text(line),
    }
}

fn tail(text: &str) -> &str {
    let text = text.trim();
    let mut start = text.len().saturating_sub(STDERR_TAIL);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
