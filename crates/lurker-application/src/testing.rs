//! In-memory `ChatTransport` used by the unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use lurker_core::LurkerError;
use lurker_core::chat::{ChatId, ChatTransport, MessageId, Outbound};
use lurker_core::error::Result;
use lurker_core::user::UserId;

/// Records every delivered action and answers name lookups from a fixed
/// member table.
///
/// Failures are configured per action (`"remove_member"`) or per action and
/// user (`"send_direct:7"`); a failing call is not recorded.
#[derive(Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<Outbound>>,
    members: HashMap<(ChatId, UserId), String>,
    failures: HashSet<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, chat: &str, user: &str, name: &str) -> Self {
        self.members
            .insert((ChatId::new(chat), UserId::new(user)), name.to_string());
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failures.insert(key.to_string());
        self
    }

    pub fn delivered(&self) -> Vec<Outbound> {
        self.delivered.lock().unwrap().clone()
    }

    fn check(&self, action: &'static str, user: &UserId) -> Result<()> {
        if self.failures.contains(action) || self.failures.contains(&format!("{action}:{user}")) {
            return Err(LurkerError::transport(action, "simulated failure"));
        }
        Ok(())
    }

    fn record(&self, action: Outbound) {
        self.delivered.lock().unwrap().push(action);
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_to_chat(&self, chat: &ChatId, text: &str) -> Result<()> {
        if self.failures.contains("send_to_chat") {
            return Err(LurkerError::transport("send_to_chat", "simulated failure"));
        }
        self.record(Outbound::send_to_chat(chat, text));
        Ok(())
    }

    async fn send_direct(&self, user: &UserId, text: &str) -> Result<()> {
        self.check("send_direct", user)?;
        self.record(Outbound::send_direct(user, text));
        Ok(())
    }

    async fn forward(&self, from_chat: &ChatId, message: &MessageId, to: &UserId) -> Result<()> {
        self.check("forward", to)?;
        self.record(Outbound::Forward {
            from_chat: from_chat.clone(),
            message: message.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    async fn remove_member(&self, chat: &ChatId, user: &UserId) -> Result<()> {
        self.check("remove_member", user)?;
        self.record(Outbound::RemoveMember {
            chat: chat.clone(),
            user: user.clone(),
        });
        Ok(())
    }

    async fn restore_member(&self, chat: &ChatId, user: &UserId) -> Result<()> {
        self.check("restore_member", user)?;
        self.record(Outbound::RestoreMember {
            chat: chat.clone(),
            user: user.clone(),
        });
        Ok(())
    }

    async fn resolve_display_name(&self, chat: &ChatId, user: &UserId) -> Result<Option<String>> {
        self.check("resolve_display_name", user)?;
        Ok(self.members.get(&(chat.clone(), user.clone())).cloned())
    }
}
