//! Chat transport trait.

use async_trait::async_trait;

use super::model::{ChatId, MessageId};
use super::outbound::Outbound;
use crate::error::Result;
use crate::user::UserId;

/// Client for the messaging platform the bot is connected to.
///
/// Implementations wrap a concrete platform API. Every call may fail with
/// [`LurkerError::Transport`](crate::error::LurkerError::Transport); callers
/// log such failures and move on.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Posts a text message into a chat.
    async fn send_to_chat(&self, chat: &ChatId, text: &str) -> Result<()>;

    /// Sends a private message to a user.
    async fn send_direct(&self, user: &UserId, text: &str) -> Result<()>;

    /// Forwards `message` from `from_chat` to `to`.
    async fn forward(&self, from_chat: &ChatId, message: &MessageId, to: &UserId) -> Result<()>;

    /// Removes a member from a chat.
    async fn remove_member(&self, chat: &ChatId, user: &UserId) -> Result<()>;

    /// Lifts a platform-level ban.
    async fn restore_member(&self, chat: &ChatId, user: &UserId) -> Result<()>;

    /// Looks up the display name of `user` as a member of `chat`.
    ///
    /// Returns `Ok(None)` when the user is not a member of the chat.
    async fn resolve_display_name(&self, chat: &ChatId, user: &UserId) -> Result<Option<String>>;

    /// Carries out a single outbound action.
    async fn deliver(&self, action: &Outbound) -> Result<()> {
        match action {
            Outbound::SendToChat { chat, text } => self.send_to_chat(chat, text).await,
            Outbound::SendDirect { user, text } => self.send_direct(user, text).await,
            Outbound::Forward {
                from_chat,
                message,
                to,
            } => self.forward(from_chat, message, to).await,
            Outbound::RemoveMember { chat, user } => self.remove_member(chat, user).await,
            Outbound::RestoreMember { chat, user } => self.restore_member(chat, user).await,
        }
    }
}
