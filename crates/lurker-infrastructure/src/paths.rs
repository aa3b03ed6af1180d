//! Unified path management for lurker files.
//!
//! Default locations are resolved via AppPaths from the version-migrate crate
//! so they follow platform conventions (XDG on Linux, Application Support on
//! macOS, AppData on Windows).

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for lurker_core::LurkerError {
    fn from(err: PathError) -> Self {
        lurker_core::LurkerError::config(err.to_string())
    }
}

/// Unified path management for lurker.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/lurker/            # Config directory (AppPaths default)
/// ├── config.toml              # Bot configuration
/// └── bot_state.json           # State snapshot
/// ```
pub struct LurkerPaths;

impl LurkerPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("lurker")
    }

    /// Returns the lurker configuration directory (e.g. `~/.config/lurker/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the state snapshot.
    pub fn state_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("bot_state.json"))
    }
}
