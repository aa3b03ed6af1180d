use anyhow::{Context, Result};
use std::sync::Arc;

use lurker_application::ModerationService;
use lurker_core::config::BotConfig;
use lurker_infrastructure::FileSnapshotRepository;

use crate::console::{self, ConsoleTransport, Members};

/// Starts the bot against the console chat and saves the state on exit.
pub async fn run(config: &BotConfig, repository: FileSnapshotRepository, title: &str) -> Result<()> {
    let path = repository.path().to_path_buf();
    // Held for the whole run; `lurker staff` refuses to edit meanwhile.
    let _lock = repository
        .lock()
        .with_context(|| format!("Another process is using {}", path.display()))?;
    let members: Members = Arc::default();
    let transport = Arc::new(ConsoleTransport::new(members.clone()));

    let service = ModerationService::start(config, transport, Arc::new(repository))
        .await
        .with_context(|| format!("Refusing to start with snapshot {}", path.display()))?;
    tracing::info!("Lurker started, state file {}", path.display());

    console::repl(&service, title, members).await?;

    service
        .flush()
        .await
        .with_context(|| format!("Failed to save state to {}", path.display()))?;
    tracing::info!("Lurker stopped");
    Ok(())
}
