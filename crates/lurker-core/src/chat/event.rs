//! Inbound events delivered by the transport layer.

use serde::{Deserialize, Serialize};

use super::model::{ChatRef, RepliedMessage};
use crate::user::Identity;

/// Prefix that marks a chat message as a bot command.
pub const COMMAND_PREFIX: char = '/';

/// A bot command received in a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Lowercased command token without the leading `/` or `@botname` suffix.
    pub command: String,
    /// Free-text argument after the first separator. May be empty.
    pub argument: String,
    pub invoker: Identity,
    pub chat: ChatRef,
    pub reply_to: Option<RepliedMessage>,
}

impl CommandEvent {
    /// Splits a raw command message into command token and argument.
    ///
    /// Returns `None` when the text is not a command, or when it is addressed
    /// to a different bot via an `@botname` suffix.
    ///
    /// ```
    /// use lurker_core::chat::{ChatRef, CommandEvent};
    /// use lurker_core::user::Identity;
    ///
    /// let event = CommandEvent::parse(
    ///     "/warn@lurker_bot stop  spamming",
    ///     Identity::new("1", "mod"),
    ///     ChatRef::new("-100", "Lounge"),
    ///     None,
    ///     Some("lurker_bot"),
    /// )
    /// .unwrap();
    /// assert_eq!(event.command, "warn");
    /// assert_eq!(event.argument, "stop  spamming");
    /// ```
    pub fn parse(
        text: &str,
        invoker: Identity,
        chat: ChatRef,
        reply_to: Option<RepliedMessage>,
        bot_username: Option<&str>,
    ) -> Option<Self> {
        let body = text.strip_prefix(COMMAND_PREFIX)?;
        let (token, argument) = split_argument(body);

        let command = match token.split_once('@') {
            Some((name, addressee)) => {
                if let Some(bot) = bot_username {
                    if !addressee.eq_ignore_ascii_case(bot.trim_start_matches('@')) {
                        return None;
                    }
                }
                name
            }
            None => token,
        };

        if command.is_empty() {
            return None;
        }

        Some(Self {
            command: command.to_lowercase(),
            argument: argument.to_string(),
            invoker,
            chat,
            reply_to,
        })
    }

    /// The identity a moderation command acts on, if the command was a reply.
    pub fn target(&self) -> Option<&Identity> {
        self.reply_to.as_ref().map(|reply| &reply.author)
    }
}

/// Splits `text` at its first whitespace character.
///
/// The argument keeps every character after that single separator, including
/// further whitespace, so stored reasons and custom texts round-trip verbatim.
pub fn split_argument(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(idx) => {
            let separator_len = text[idx..].chars().next().map_or(1, char::len_utf8);
            (&text[..idx], &text[idx + separator_len..])
        }
        None => (text, ""),
    }
}

/// A plain (non-command) chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextEvent {
    pub text: String,
    pub chat: ChatRef,
}

impl TextEvent {
    pub fn new(text: impl Into<String>, chat: ChatRef) -> Self {
        Self {
            text: text.into(),
            chat,
        }
    }
}
