// ABOUTME: Entry point for studyclaw — runs the study-state tools from the command line.
// ABOUTME: Parses CLI args, loads config, and prints each tool's JSON result to stdout.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use studyclaw::config::Config;
use studyclaw::session::StudyStore;
use studyclaw::tools::ToolRegistry;
use studyclaw::tools::study::{
    APPEND_DAILY_CHECKIN, LOAD_STUDY_STATE, LOG_SESSION_EVENT, SAVE_STUDY_STATE,
};

#[derive(Parser, Debug)]
#[command(
    name = "studyclaw",
    version,
    about = "Local study-state persistence for a study-planning agent"
)]
struct Cli {
    /// Config file (defaults to ~/.studyclaw/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the state document path
    #[arg(long, global = true, value_name = "PATH")]
    state_file: Option<PathBuf>,
    /// Override the session log path
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the saved study state
    Load,
    /// Replace the study state with a JSON object ("-" reads stdin)
    Save { state_json: String },
    /// Append an event to the session log
    Log { event_type: String, details: String },
    /// Append a daily check-in note
    Checkin { note: String },
    /// List tool definitions
    Tools,
    /// Call a tool by name with a JSON params object
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        params: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    }
    .with_overrides(cli.state_file.clone(), cli.log_file.clone());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = Arc::new(StudyStore::new(config.storage));
    let registry = ToolRegistry::study_tools(store);

    let output = run(cli.command, &registry).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(command: Command, registry: &ToolRegistry) -> anyhow::Result<Value> {
    match command {
        Command::Load => registry.call(LOAD_STUDY_STATE, json!({})).await,
        Command::Save { state_json } => {
            let state_json = if state_json == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read state from stdin")?;
                buf
            } else {
                state_json
            };
            registry
                .call(SAVE_STUDY_STATE, json!({ "state_json": state_json }))
                .await
        }
        Command::Log {
            event_type,
            details,
        } => {
            registry
                .call(
                    LOG_SESSION_EVENT,
                    json!({ "event_type": event_type, "details": details }),
                )
                .await
        }
        Command::Checkin { note } => {
            registry
                .call(APPEND_DAILY_CHECKIN, json!({ "note": note }))
                .await
        }
        Command::Tools => Ok(serde_json::to_value(registry.definitions())?),
        Command::Call { tool, params } => {
            let params: Value = serde_json::from_str(&params)
                .with_context(|| format!("params for {tool} must be a JSON object"))?;
            registry.call(&tool, params).await
        }
    }
}
