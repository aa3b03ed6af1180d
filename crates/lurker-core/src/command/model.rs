//! Built-in bot commands.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A command the bot understands, keyed by its chat token.
///
/// Parsing is case-insensitive: `"/NoWarns"` resolves to
/// [`Command::ClearWarnings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Command {
    Help,
    Warn,
    Unwarn,
    #[strum(serialize = "nowarns")]
    ClearWarnings,
    Ban,
    Unban,
    #[strum(serialize = "user")]
    UserStatus,
    #[strum(serialize = "staff")]
    ListStaff,
    Report,
    #[strum(serialize = "addcommand")]
    AddCustomCommand,
    #[strum(serialize = "removecommand")]
    RemoveCustomCommand,
}

impl Command {
    /// Resolves a command token (without the leading `/`).
    pub fn from_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    /// The token users type after `/`.
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// Whether the invoker must be on the staff roster.
    pub fn is_staff_only(self) -> bool {
        matches!(
            self,
            Self::Warn
                | Self::Unwarn
                | Self::ClearWarnings
                | Self::Ban
                | Self::Unban
                | Self::AddCustomCommand
                | Self::RemoveCustomCommand
        )
    }

    /// Whether the command acts on the author of the replied-to message.
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            Self::Warn | Self::Unwarn | Self::ClearWarnings | Self::Ban | Self::Unban
        )
    }
}

/// Normalizes a custom command token for storage and lookup.
pub fn normalize_custom_token(token: &str) -> String {
    token.to_lowercase()
}
