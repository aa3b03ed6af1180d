use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lurker_infrastructure::{ConfigService, FileSnapshotRepository};

mod commands;
mod console;
mod logging;

#[derive(Parser)]
#[command(name = "lurker")]
#[command(about = "Lurker - group chat moderation bot", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the state snapshot, overriding `state_file` from the config
    #[arg(long, global = true, value_name = "FILE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot against an interactive console chat
    Run {
        /// Title of the simulated chat
        #[arg(long, default_value = "Console")]
        title: String,
    },
    /// Validate the state snapshot and print a summary
    Check,
    /// Manage the staff roster
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
}

#[derive(Subcommand)]
enum StaffAction {
    /// List staff user ids
    List,
    /// Add a user id to the staff roster
    Add { id: String },
    /// Remove a user id from the staff roster
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load config {}", config_service.path().display()))?;
    if let Some(state) = cli.state {
        config.state_file = Some(state);
    }

    logging::init(&config.log_filter);

    let repository = FileSnapshotRepository::with_path(ConfigService::state_file(&config)?);

    match cli.command {
        Commands::Run { title } => commands::run::run(&config, repository, &title).await?,
        Commands::Check => commands::check::run(&repository)?,
        Commands::Staff { action } => match action {
            StaffAction::List => commands::staff::list(&repository)?,
            StaffAction::Add { id } => commands::staff::add(&repository, &id)?,
            StaffAction::Remove { id } => commands::staff::remove(&repository, &id)?,
        },
    }

    Ok(())
}
