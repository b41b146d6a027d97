//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde_json::Value;
use st_core::init::{generate_smarttask_structure, InitOptions};
use st_core::store::StatusFilter;
use st_core::SmartTask;
use st_protocol::{A2AMessage, Event, EventKind, Task, ToolResult};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

pub async fn chat(root: &Path, user: &str) -> Result<()> {
    let app = SmartTask::load(root).await?;

    println!("{}", "SmartTask - Multi-Agent Task Assistant".bold());
    println!("Type a message, 'metrics' for system metrics, or 'quit' to leave.\n");

    let bus = app.bus().start();
    tracing::debug!(user, agents = ?app.bus().registered_agents(), "chat session started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }
        if input.eq_ignore_ascii_case("metrics") {
            println!("\n{}", "System Metrics:".bold());
            println!("{}\n", serde_json::to_string_pretty(&app.tracker().metrics())?);
            continue;
        }

        let reply = app.chat().hybrid_chat(input, user).await;
        println!("\n{} {reply}\n", "agent>".cyan().bold());
    }

    app.bus().stop();
    bus.await.context("Message processor panicked")??;
    tracing::debug!(user, "chat session ended");
    Ok(())
}

pub async fn ask(root: &Path, user: &str, text: &str) -> Result<()> {
    let app = SmartTask::load(root).await?;
    let reply = app.orchestrator().execute_workflow(text, user).await;
    println!("{reply}");
    Ok(())
}

pub async fn metrics(root: &Path) -> Result<()> {
    let app = SmartTask::load(root).await?;
    println!("{}", serde_json::to_string_pretty(&app.tracker().metrics())?);
    Ok(())
}

pub async fn tasks(root: &Path, status: &str) -> Result<()> {
    let filter: StatusFilter = status.parse()?;
    let app = SmartTask::load(root).await?;

    let result = app.tools().list_tasks(filter).await;
    let tasks = tool_output(&result)?.tasks().unwrap_or_default();
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    for task in tasks {
        println!("{}", format_task(task));
    }
    Ok(())
}

pub async fn goals(root: &Path) -> Result<()> {
    let app = SmartTask::load(root).await?;

    let result = app.tools().list_long_term_goals().await;
    let goals = tool_output(&result)?.goals().unwrap_or_default();
    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }
    for goal in goals {
        let category = if goal.category.is_empty() {
            String::new()
        } else {
            format!(" [{}]", goal.category)
        };
        println!(
            "{} {} ({} months){category}",
            "🎯".bold(),
            goal.goal,
            goal.horizon_months
        );
    }
    Ok(())
}

pub async fn send(
    root: &Path,
    from: &str,
    to: &str,
    message_type: &str,
    content: &str,
    wait_ms: u64,
) -> Result<()> {
    let content: Value = serde_json::from_str(content).context("Message content must be valid JSON")?;
    if !content.is_object() {
        bail!("Message content must be a JSON object");
    }

    let app = SmartTask::load(root).await?;
    let bus = app.bus().start();

    app.bus()
        .send(A2AMessage::new(from, to, message_type, content))
        .await?;
    tokio::time::sleep(Duration::from_millis(wait_ms)).await;

    app.bus().stop();
    bus.await.context("Message processor panicked")??;

    for event in app.tracker().events() {
        println!("{}", format_event(&event));
    }
    Ok(())
}

pub async fn init(root: &Path, force: bool) -> Result<()> {
    let written = generate_smarttask_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
    })
    .await?;

    println!("{} Initialized SmartTask in {}", "✓".green().bold(), root.display());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn tool_output(result: &ToolResult) -> Result<&ToolResult> {
    match result {
        ToolResult::Error { message, .. } => bail!("{message}"),
        other => Ok(other),
    }
}

fn format_task(task: &Task) -> String {
    let priority = match task.priority.as_str() {
        "high" => "high".red().bold(),
        "low" => "low".dimmed(),
        other => other.normal(),
    };
    let due = task
        .due_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(" due {d}"))
        .unwrap_or_default();
    format!("#{} [{}] {} ({priority}){due}", task.id, task.status, task.title)
}

fn format_event(event: &Event) -> String {
    let kind = match event.kind {
        EventKind::Error => event.kind.as_str().red().bold(),
        EventKind::A2ACommunication => event.kind.as_str().cyan(),
        _ => event.kind.as_str().normal(),
    };
    let details = serde_json::to_string(&event.details).unwrap_or_default();
    format!("{kind} {} {details}", event.source_name.bold())
}
