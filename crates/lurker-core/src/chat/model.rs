//! Chat and message references handed over by the transport layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::user::Identity;

/// Platform identifier of a group chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform identifier of a single message within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The chat a command or message arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRef {
    pub id: ChatId,
    /// Human-readable chat title, used in report notifications.
    pub title: String,
}

impl ChatRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ChatId::new(id),
            title: title.into(),
        }
    }
}

/// The message a command was issued in reply to.
///
/// Its author is the target of every moderation command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepliedMessage {
    pub id: MessageId,
    pub author: Identity,
}

impl RepliedMessage {
    pub fn new(id: impl Into<String>, author: Identity) -> Self {
        Self {
            id: MessageId::new(id),
            author,
        }
    }
}
