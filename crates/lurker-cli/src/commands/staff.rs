//! Out-of-band staff roster edits.
//!
//! The roster is never changed from the chat; operators edit the snapshot
//! with these commands while no bot is running against it.

use anyhow::{Context, Result, bail};

use lurker_core::user::UserId;
use lurker_infrastructure::FileSnapshotRepository;

pub fn list(repository: &FileSnapshotRepository) -> Result<()> {
    let state = repository
        .load_blocking()
        .with_context(|| format!("Failed to load {}", repository.path().display()))?;

    if state.staff.is_empty() {
        println!("No staff members configured.");
        return Ok(());
    }

    println!("📋 Staff ({}):", state.staff.len());
    for id in &state.staff {
        println!("  - {}", id);
    }
    Ok(())
}

pub fn add(repository: &FileSnapshotRepository, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let added = repository
        .update(|state| state.add_staff(id.clone()))
        .with_context(|| format!("Failed to update {}", repository.path().display()))?;

    if added {
        tracing::info!("Added {} to staff", id);
        println!("✅ {} is now staff", id);
    } else {
        println!("{} is already staff", id);
    }
    Ok(())
}

pub fn remove(repository: &FileSnapshotRepository, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let removed = repository
        .update(|state| state.remove_staff(&id))
        .with_context(|| format!("Failed to update {}", repository.path().display()))?;

    if removed {
        tracing::info!("Removed {} from staff", id);
        println!("✅ {} is no longer staff", id);
    } else {
        println!("{} was not staff", id);
    }
    Ok(())
}

fn parse_id(id: &str) -> Result<UserId> {
    let id = id.trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        bail!("Invalid user id: {:?}", id);
    }
    Ok(UserId::new(id))
}
