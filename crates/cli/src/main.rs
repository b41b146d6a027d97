//! `smarttask` command-line front end.

mod commands;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smarttask")]
#[command(author, version, about = "Multi-agent task and goal assistant", long_about = None)]
struct Cli {
    /// Project root holding the .smarttask directory
    #[arg(long, global = true, default_value = ".", env = "SMARTTASK_ROOT")]
    root: PathBuf,

    /// User id handed to agents
    #[arg(long, global = true, default_value = "cli_user")]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (the default)
    Chat,

    /// Run one request through the agent workflow
    Ask {
        /// Request text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print the metrics summary as JSON
    Metrics,

    /// List tasks
    Tasks {
        /// Status filter: all, pending, in_progress or done
        #[arg(long, default_value = "all")]
        status: String,
    },

    /// List long-term goals
    Goals,

    /// Send an A2A message and print the events it produced
    Send {
        /// Sending agent name
        from: String,
        /// Recipient agent name
        to: String,
        /// Message type, e.g. decompose_goal
        message_type: String,
        /// Message content as a JSON object
        #[arg(default_value = "{}")]
        content: String,
        /// How long to let the bus process before stopping it
        #[arg(long, default_value_t = 500)]
        wait_ms: u64,
    },

    /// Create the .smarttask directory from the built-in templates
    Init {
        /// Overwrite an existing .smarttask directory
        #[arg(long)]
        force: bool,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let root = cli.root;
    let user = cli.user;

    let result = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat(&root, &user).await,
        Commands::Ask { text } => commands::ask(&root, &user, &text.join(" ")).await,
        Commands::Metrics => commands::metrics(&root).await,
        Commands::Tasks { status } => commands::tasks(&root, &status).await,
        Commands::Goals => commands::goals(&root).await,
        Commands::Send {
            from,
            to,
            message_type,
            content,
            wait_ms,
        } => commands::send(&root, &from, &to, &message_type, &content, wait_ms).await,
        Commands::Init { force } => commands::init(&root, force).await,
    };

    result.map_err(|e| eyre!(e))
}
