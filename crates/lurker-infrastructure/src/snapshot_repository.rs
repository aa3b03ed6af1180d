//! Snapshot repository implementation.
//!
//! Stores the whole `SessionState` as one versioned JSON document.
//! Uses version-migrate for schema versioning and an atomic temp-file +
//! rename write so a crash never leaves a half-written snapshot behind.
//!
//! File location: `~/.config/lurker/bot_state.json` unless configured otherwise.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lurker_core::LurkerError;
use lurker_core::error::Result;
use lurker_core::state::{SessionState, SnapshotRepository};

use crate::dto::{LEGACY_SNAPSHOT_VERSION, SNAPSHOT_ENTITY, SNAPSHOT_KEYS, create_snapshot_migrator};
use crate::paths::LurkerPaths;
use crate::storage::{AtomicFile, FileLock};

/// File-based snapshot repository with version migration support.
#[derive(Clone)]
pub struct FileSnapshotRepository {
    file: Arc<SnapshotFile>,
}

impl FileSnapshotRepository {
    /// Creates a repository at the default snapshot location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(LurkerPaths::state_file()?))
    }

    /// Creates a repository for a custom snapshot path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(SnapshotFile {
                file: AtomicFile::new(path),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.file.path()
    }

    /// Applies `f` to the persisted state under an exclusive file lock and
    /// writes the result back.
    ///
    /// This is how the staff roster is edited out-of-band. Fails without
    /// touching the file while a running bot holds the lock, since its final
    /// save would overwrite the edit.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SessionState) -> T,
    {
        let _lock = self.lock()?;
        let mut state = self.file.load()?;
        let output = f(&mut state);
        self.file.save(&state)?;
        Ok(output)
    }

    /// Takes the snapshot lock without waiting.
    ///
    /// A running bot holds this for its whole lifetime so no other process
    /// edits the snapshot underneath it.
    pub fn lock(&self) -> Result<FileLock> {
        Ok(self.file.file.try_lock()?)
    }

    /// Loads the snapshot without going through the async runtime.
    pub fn load_blocking(&self) -> Result<SessionState> {
        self.file.load()
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn load(&self) -> Result<SessionState> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| LurkerError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn save(&self, state: &SessionState) -> Result<()> {
        let file = self.file.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || file.save(&state))
            .await
            .map_err(|e| LurkerError::internal(format!("Failed to join task: {}", e)))?
    }
}

/// Synchronous encode/decode half of the repository.
struct SnapshotFile {
    file: AtomicFile,
}

impl SnapshotFile {
    fn load(&self) -> Result<SessionState> {
        match self.file.load()? {
            Some(content) => self.decode(&content),
            None => {
                tracing::info!(
                    "No snapshot at {}, starting with empty state",
                    self.file.path().display()
                );
                Ok(SessionState::default())
            }
        }
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        let contents = encode(state)?;
        self.file.save(&contents)?;
        tracing::debug!("Snapshot written to {}", self.file.path().display());
        Ok(())
    }

    fn decode(&self, content: &str) -> Result<SessionState> {
        let corrupt = |reason: String| LurkerError::corrupt_snapshot(self.file.path(), reason);

        if content.trim().is_empty() {
            return Err(corrupt("file is empty".to_string()));
        }

        let mut value: JsonValue = serde_json::from_str(content)
            .map_err(|e| corrupt(format!("invalid JSON: {}", e)))?;

        let object = value
            .as_object_mut()
            .ok_or_else(|| corrupt("top level is not an object".to_string()))?;

        if let Some(unknown) = object
            .keys()
            .find(|key| !SNAPSHOT_KEYS.contains(&key.as_str()))
        {
            return Err(corrupt(format!("unknown section '{}'", unknown)));
        }

        if !object.contains_key("version") {
            tracing::info!(
                "Snapshot {} has no version, reading it as {}",
                self.file.path().display(),
                LEGACY_SNAPSHOT_VERSION
            );
            object.insert(
                "version".to_string(),
                JsonValue::String(LEGACY_SNAPSHOT_VERSION.to_string()),
            );
        }

        create_snapshot_migrator()
            .load_flat_from(SNAPSHOT_ENTITY, value)
            .map_err(|e| corrupt(e.to_string()))
    }
}

/// Serializes `state` as pretty-printed, key-sorted JSON with a version tag.
fn encode(state: &SessionState) -> Result<String> {
    let flat = create_snapshot_migrator()
        .save_domain_flat(SNAPSHOT_ENTITY, state.clone())
        .map_err(|e| LurkerError::Migration(format!("Failed to serialize snapshot: {}", e)))?;

    // Nested maps are already sorted; re-key the top level so sections are too.
    let value: BTreeMap<String, JsonValue> = serde_json::from_str(&flat)?;
    let mut pretty = serde_json::to_string_pretty(&value)?;
    pretty.push('\n');
    Ok(pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lurker_core::user::{Identity, UserId};
    use tempfile::TempDir;

    fn populated_state() -> SessionState {
        let mut state = SessionState::new();
        state.add_staff(UserId::new("100"));
        state.add_staff(UserId::new("101"));
        state.add_warning(&UserId::new("200"), "spam");
        state.add_warning(&UserId::new("200"), "  padded reason ");
        state.ban(&Identity::new("300", "troll"));
        state.set_custom_command("rules", "1. Be nice\n2. No spam");
        state
    }

    #[tokio::test]
    async fn test_load_default_when_not_exists() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));

        let state = repo.load().await.unwrap();
        assert!(state.is_empty());
    }

    #[tokio::test]
    async fn test_roundtrip_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));

        repo.save(&SessionState::new()).await.unwrap();
        assert!(repo.path().exists());
        assert_eq!(repo.load().await.unwrap(), SessionState::new());
    }

    #[tokio::test]
    async fn test_roundtrip_populated_state() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));
        let state = populated_state();

        repo.save(&state).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded, state);
        assert_eq!(
            loaded.warnings_for(&UserId::new("200")),
            ["spam", "  padded reason "]
        );
    }

    #[tokio::test]
    async fn test_legacy_snapshot_without_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_state.json");
        std::fs::write(
            &path,
            r#"{
 "bans": {"5": {"name": "eve"}},
 "custom": {"faq": "Read the pinned message"},
 "staff": ["1"],
 "warnings": {"6": ["off-topic"]}
}"#,
        )
        .unwrap();

        let repo = FileSnapshotRepository::with_path(path);
        let state = repo.load().await.unwrap();

        assert!(state.is_staff(&UserId::new("1")));
        assert!(state.is_banned(&UserId::new("5")));
        assert_eq!(state.warnings_for(&UserId::new("6")), ["off-topic"]);
        assert_eq!(state.custom_command("faq"), Some("Read the pinned message"));
    }

    #[tokio::test]
    async fn test_legacy_snapshot_with_null_ban_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_state.json");
        std::fs::write(
            &path,
            r#"{"bans": {"5": {"name": null}}, "custom": {}, "staff": ["1"], "warnings": {}}"#,
        )
        .unwrap();

        let repo = FileSnapshotRepository::with_path(path);
        let state = repo.load().await.unwrap();

        assert!(state.is_banned(&UserId::new("5")));
        assert_eq!(state.bans[&UserId::new("5")].display_name, "5");

        repo.save(&state).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_corrupt_snapshots_fail_loudly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bot_state.json");
        let repo = FileSnapshotRepository::with_path(path.clone());

        for content in [
            "",
            "{\"staff\": [\"1\"",
            "[1, 2, 3]",
            "{\"staff\": [], \"admins\": []}",
            "{\"warnings\": {\"1\": \"not a list\"}}",
            "{\"bans\": {\"5\": {\"name\": \"eve\", \"reason\": \"x\"}}}",
        ] {
            std::fs::write(&path, content).unwrap();
            let err = repo.load().await.unwrap_err();
            assert!(
                err.is_corrupt_snapshot(),
                "expected corrupt snapshot for {:?}, got {:?}",
                content,
                err
            );
        }
    }

    #[test]
    fn test_update_persists_changes() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));

        let added = repo
            .update(|state| state.add_staff(UserId::new("42")))
            .unwrap();
        assert!(added);

        let added_again = repo
            .update(|state| state.add_staff(UserId::new("42")))
            .unwrap();
        assert!(!added_again);

        let state = repo.load_blocking().unwrap();
        assert_eq!(state.staff, vec![UserId::new("42")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_update_refused_while_locked() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));
        repo.update(|state| state.add_staff(UserId::new("1"))).unwrap();

        let running = repo.lock().unwrap();
        let err = repo
            .update(|state| state.add_staff(UserId::new("2")))
            .unwrap_err();
        assert!(err.to_string().contains("locked"));
        assert_eq!(repo.load_blocking().unwrap().staff, vec![UserId::new("1")]);

        drop(running);
        assert!(repo.update(|state| state.add_staff(UserId::new("2"))).unwrap());
    }

    #[test]
    fn test_saved_file_is_sorted_and_versioned() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileSnapshotRepository::with_path(temp_dir.path().join("bot_state.json"));
        repo.update(|state| *state = populated_state()).unwrap();

        let raw = std::fs::read_to_string(repo.path()).unwrap();
        let bans = raw.find("\"bans\"").unwrap();
        let custom = raw.find("\"custom\"").unwrap();
        let staff = raw.find("\"staff\"").unwrap();
        assert!(bans < custom && custom < staff);
        assert!(raw.contains("\"version\": \"1.0.0\""));
    }
}
