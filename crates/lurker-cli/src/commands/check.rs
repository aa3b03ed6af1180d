use anyhow::{Context, Result};

use lurker_infrastructure::FileSnapshotRepository;

/// Loads the snapshot and prints a summary, failing on corruption.
pub fn run(repository: &FileSnapshotRepository) -> Result<()> {
    let path = repository.path().display();
    println!("🔍 Checking {}...", path);

    let state = repository
        .load_blocking()
        .with_context(|| format!("Snapshot {} is not usable", path))?;

    println!("✅ Snapshot is valid");
    println!("  - staff: {}", state.staff.len());
    println!("  - warned users: {}", state.warnings.len());
    println!("  - banned users: {}", state.bans.len());
    println!("  - custom commands: {}", state.custom.len());

    Ok(())
}
