//! Configuration service implementation.
//!
//! Loads the bot configuration from `~/.config/lurker/config.toml` or an
//! explicit path. A missing file means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use lurker_core::LurkerError;
use lurker_core::config::BotConfig;
use lurker_core::error::Result;

use crate::paths::LurkerPaths;

/// Resolves and loads `BotConfig`.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default config location.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: LurkerPaths::config_file()?,
        })
    }

    /// Uses an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the configuration.
    pub fn load(&self) -> Result<BotConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No config at {}, using defaults",
                    self.path.display()
                );
                return Ok(BotConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: BotConfig = toml::from_str(&content).map_err(|e| {
            LurkerError::config(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        config.validate().map_err(|e| match e {
            LurkerError::Config(reason) => {
                LurkerError::config(format!("Invalid {}: {}", self.path.display(), reason))
            }
            other => other,
        })?;

        Ok(config)
    }

    /// Resolves the snapshot path: explicit config value, else the default.
    pub fn state_file(config: &BotConfig) -> Result<PathBuf> {
        match &config.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(LurkerPaths::state_file()?),
        }
    }
}
