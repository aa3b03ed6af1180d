//! Bot configuration domain model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LurkerError, Result};

/// Default marker that turns a chat message into a custom command trigger.
pub const DEFAULT_TRIGGER_MARKER: &str = "!";

/// When the in-memory state is written to the snapshot file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Flush once at orderly shutdown. A crash loses everything since start.
    #[default]
    OnShutdown,
    /// Additionally flush after every command that changed the state.
    AfterEachMutation,
}

/// Runtime configuration of a bot instance, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Snapshot file location. `None` means the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    /// Prefix that marks a custom command trigger (e.g. `!rules`).
    pub trigger_marker: String,
    /// The bot's own username, used to ignore `/cmd@other_bot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_username: Option<String>,
    pub persist: PersistPolicy,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            trigger_marker: DEFAULT_TRIGGER_MARKER.to_string(),
            bot_username: None,
            persist: PersistPolicy::OnShutdown,
            log_filter: "info".to_string(),
        }
    }
}

impl BotConfig {
    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.trigger_marker.trim().is_empty() {
            return Err(LurkerError::config(
                "trigger_marker must not be empty or whitespace",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.trigger_marker, "!");
        assert_eq!(config.persist, PersistPolicy::OnShutdown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BotConfig = toml::from_str("persist = \"after_each_mutation\"").unwrap();
        assert_eq!(config.persist, PersistPolicy::AfterEachMutation);
        assert_eq!(config.trigger_marker, "!");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_blank_marker_is_invalid() {
        let config = BotConfig {
            trigger_marker: " ".to_string(),
            ..BotConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("trigger_marker"));
    }
}
