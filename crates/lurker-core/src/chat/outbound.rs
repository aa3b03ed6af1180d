//! Outbound actions produced by command handling.

use serde::{Deserialize, Serialize};

use super::model::{ChatId, MessageId};
use crate::user::UserId;

/// A side effect the transport layer must carry out on the platform.
///
/// Actions are produced after the corresponding state change has been
/// applied; delivering them never feeds back into the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Post a text message into a chat.
    SendToChat { chat: ChatId, text: String },
    /// Send a private message to a user.
    SendDirect { user: UserId, text: String },
    /// Forward an existing chat message to a user.
    Forward {
        from_chat: ChatId,
        message: MessageId,
        to: UserId,
    },
    /// Kick a member out of a chat.
    RemoveMember { chat: ChatId, user: UserId },
    /// Lift a platform-level ban so the user may rejoin.
    RestoreMember { chat: ChatId, user: UserId },
}

impl Outbound {
    pub fn send_to_chat(chat: &ChatId, text: impl Into<String>) -> Self {
        Self::SendToChat {
            chat: chat.clone(),
            text: text.into(),
        }
    }

    pub fn send_direct(user: &UserId, text: impl Into<String>) -> Self {
        Self::SendDirect {
            user: user.clone(),
            text: text.into(),
        }
    }

    /// Short action name used in logs and transport errors.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::SendToChat { .. } => "send_to_chat",
            Self::SendDirect { .. } => "send_direct",
            Self::Forward { .. } => "forward",
            Self::RemoveMember { .. } => "remove_member",
            Self::RestoreMember { .. } => "restore_member",
        }
    }
}
