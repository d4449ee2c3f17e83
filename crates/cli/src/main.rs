use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod tui;

use config::Config;

/// Taskdeck - project and task tracking from the terminal
#[derive(Parser)]
#[command(
    name = "taskdeck",
    version,
    about = "Browse projects and manage tasks from the terminal",
    long_about = "Terminal client for the taskdeck project tracker.\n\n\
                  Opens a full-screen board backed by the taskdeck REST API: search and\n\
                  page through your projects, then drill into one to work its tasks."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the taskdeck service
    #[arg(long, global = true, env = "TASKDECK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive board (the default)
    Board,

    /// Sign in (or create an account) and store the session token
    Login,

    /// Forget the stored session token
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.api_url)?;
    init_logging(&config)?;

    match cli.command.unwrap_or(Commands::Board) {
        Commands::Board => commands::board::run(config).await,
        Commands::Login => commands::login::run(config).await,
        Commands::Logout => commands::logout::run(&config),
    }
}

/// Route tracing output to a file so it never corrupts the board display.
fn init_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.state_dir).with_context(|| {
        format!("Failed to create state directory {}", config.state_dir.display())
    })?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
