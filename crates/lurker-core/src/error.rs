//! Error types for the Lurker moderation bot.

use std::path::PathBuf;
use thiserror::Error;

/// A shared error type for the entire Lurker workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum LurkerError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// The persisted snapshot exists but cannot be trusted.
    #[error("Corrupt snapshot at {}: {reason}", path.display())]
    CorruptSnapshot { path: PathBuf, reason: String },

    /// A call into the chat platform failed
    #[error("Transport error during {action}: {message}")]
    Transport {
        action: &'static str,
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LurkerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a CorruptSnapshot error
    pub fn corrupt_snapshot(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(action: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            action,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the persisted snapshot was rejected as corrupt
    pub fn is_corrupt_snapshot(&self) -> bool {
        matches!(self, Self::CorruptSnapshot { .. })
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LurkerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LurkerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LurkerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for LurkerError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, LurkerError>`.
pub type Result<T> = std::result::Result<T, LurkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: LurkerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(err.is_io());
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_corrupt_snapshot_display() {
        let err = LurkerError::corrupt_snapshot("/tmp/bot_state.json", "unexpected end of file");
        assert!(err.is_corrupt_snapshot());
        assert_eq!(
            err.to_string(),
            "Corrupt snapshot at /tmp/bot_state.json: unexpected end of file"
        );
    }

    #[test]
    fn test_transport_error_names_action() {
        let err = LurkerError::transport("kick", "bot lacks rights");
        assert!(err.is_transport());
        assert!(!err.is_config());
        assert_eq!(err.to_string(), "Transport error during kick: bot lacks rights");
    }
}
