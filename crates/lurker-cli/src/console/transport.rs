//! Terminal-backed `ChatTransport`.

use async_trait::async_trait;
use colored::Colorize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lurker_core::LurkerError;
use lurker_core::chat::{ChatId, ChatTransport, MessageId};
use lurker_core::error::Result;
use lurker_core::user::UserId;

/// Display names of everyone who has spoken in the console chat.
pub type Members = Arc<Mutex<HashMap<UserId, String>>>;

/// Prints every platform action instead of performing it.
///
/// Kicked users leave the member table until they are restored, so `/staff`
/// reports them as not in the chat.
pub struct ConsoleTransport {
    members: Members,
}

impl ConsoleTransport {
    pub fn new(members: Members) -> Self {
        Self { members }
    }

    fn members(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, String>>> {
        self.members
            .lock()
            .map_err(|e| LurkerError::internal(format!("Member table poisoned: {}", e)))
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send_to_chat(&self, chat: &ChatId, text: &str) -> Result<()> {
        println!("{}", format!("[bot -> {}]", chat).bright_magenta());
        for line in text.lines() {
            println!("{}", line.bright_blue());
        }
        Ok(())
    }

    async fn send_direct(&self, user: &UserId, text: &str) -> Result<()> {
        println!("{}", format!("[bot -> {} (direct)]", user).magenta());
        for line in text.lines() {
            println!("{}", line.blue());
        }
        Ok(())
    }

    async fn forward(&self, from_chat: &ChatId, message: &MessageId, to: &UserId) -> Result<()> {
        println!(
            "{}",
            format!("[forwarded message {} from {} to {}]", message, from_chat, to).yellow()
        );
        Ok(())
    }

    async fn remove_member(&self, chat: &ChatId, user: &UserId) -> Result<()> {
        self.members()?.remove(user);
        println!("{}", format!("[{} removed from {}]", user, chat).red());
        Ok(())
    }

    async fn restore_member(&self, chat: &ChatId, user: &UserId) -> Result<()> {
        println!("{}", format!("[{} may rejoin {}]", user, chat).green());
        Ok(())
    }

    async fn resolve_display_name(&self, _chat: &ChatId, user: &UserId) -> Result<Option<String>> {
        Ok(self.members()?.get(user).cloned())
    }
}
