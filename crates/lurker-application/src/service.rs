//! Moderation service.
//!
//! Owns the live `SessionState` and runs every inbound event through the
//! dispatcher one at a time: authorize, mutate, persist (if configured) and
//! deliver all happen under the same lock.

use std::sync::Arc;
use tokio::sync::Mutex;

use lurker_core::chat::{ChatTransport, CommandEvent, Outbound, TextEvent};
use lurker_core::config::{BotConfig, PersistPolicy};
use lurker_core::error::Result;
use lurker_core::state::{SessionState, SnapshotRepository};

use crate::dispatcher::{CommandDispatcher, DispatchOutcome};

/// Application service wiring the dispatcher to a transport and a snapshot
/// repository.
///
/// # Thread Safety
///
/// Cloning is cheap and every clone shares the same state. Commands are
/// serialized through a `tokio::sync::Mutex` that is held until the last
/// outbound action of a command has been attempted.
#[derive(Clone)]
pub struct ModerationService {
    state: Arc<Mutex<SessionState>>,
    dispatcher: CommandDispatcher,
    transport: Arc<dyn ChatTransport>,
    repository: Arc<dyn SnapshotRepository>,
    persist: PersistPolicy,
}

impl ModerationService {
    /// Creates a service around an already loaded state.
    pub fn new(
        state: SessionState,
        dispatcher: CommandDispatcher,
        transport: Arc<dyn ChatTransport>,
        repository: Arc<dyn SnapshotRepository>,
        persist: PersistPolicy,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            dispatcher,
            transport,
            repository,
            persist,
        }
    }

    /// Loads the last snapshot and builds a service from `config`.
    ///
    /// Fails if the snapshot exists but is corrupt; the caller must not start
    /// the bot with an empty state in that case.
    pub async fn start(
        config: &BotConfig,
        transport: Arc<dyn ChatTransport>,
        repository: Arc<dyn SnapshotRepository>,
    ) -> Result<Self> {
        let state = repository.load().await?;
        tracing::info!(
            "Loaded state: {} staff, {} warned, {} banned, {} custom commands",
            state.staff.len(),
            state.warnings.len(),
            state.bans.len(),
            state.custom.len()
        );

        let dispatcher =
            CommandDispatcher::new(config.trigger_marker.clone(), config.bot_username.clone());
        Ok(Self::new(state, dispatcher, transport, repository, config.persist))
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Handles one command end to end.
    ///
    /// Transport failures are logged and skipped; they never undo the state
    /// change and never stop the remaining actions from being attempted.
    pub async fn handle_command(&self, event: &CommandEvent) -> DispatchOutcome {
        let mut state = self.state.lock().await;
        let outcome = self
            .dispatcher
            .dispatch(&mut state, event, self.transport.as_ref())
            .await;

        if outcome.mutated && self.persist == PersistPolicy::AfterEachMutation {
            if let Err(e) = self.repository.save(&state).await {
                tracing::error!("Failed to persist state after /{}: {}", event.command, e);
            }
        }

        self.deliver(&outcome.actions).await;
        outcome
    }

    /// Handles a plain chat message, answering custom command triggers.
    pub async fn handle_text(&self, event: &TextEvent) -> Option<Outbound> {
        let state = self.state.lock().await;
        let reply = self.dispatcher.on_text(&state, event)?;
        self.deliver(std::slice::from_ref(&reply)).await;
        Some(reply)
    }

    /// Writes the current state to the snapshot repository.
    pub async fn flush(&self) -> Result<()> {
        let state = self.state.lock().await;
        self.repository.save(&state).await?;
        tracing::info!("State saved");
        Ok(())
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    async fn deliver(&self, actions: &[Outbound]) {
        for action in actions {
            if let Err(e) = self.transport.deliver(action).await {
                tracing::warn!("Failed to {}: {}", action.action_name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use async_trait::async_trait;
    use lurker_core::LurkerError;
    use lurker_core::chat::{ChatId, ChatRef, RepliedMessage};
    use lurker_core::user::{Identity, UserId};
    use std::sync::Mutex as StdMutex;

    /// Keeps saved snapshots in memory.
    #[derive(Default)]
    struct MemoryRepository {
        saved: StdMutex<Vec<SessionState>>,
        fail: bool,
    }

    #[async_trait]
    impl SnapshotRepository for MemoryRepository {
        async fn load(&self) -> Result<SessionState> {
            Ok(self.saved.lock().unwrap().last().cloned().unwrap_or_default())
        }

        async fn save(&self, state: &SessionState) -> Result<()> {
            if self.fail {
                return Err(LurkerError::io("disk full"));
            }
            self.saved.lock().unwrap().push(state.clone());
            Ok(())
        }
    }

    fn staffed_state() -> SessionState {
        let mut state = SessionState::new();
        state.add_staff(UserId::new("1"));
        state.add_staff(UserId::new("2"));
        state
    }

    fn command(text: &str, target: Option<Identity>) -> CommandEvent {
        CommandEvent::parse(
            text,
            Identity::new("1", "mod"),
            ChatRef::new("-100", "Lounge"),
            target.map(|author| RepliedMessage::new("77", author)),
            None,
        )
        .unwrap()
    }

    fn service(
        transport: Arc<RecordingTransport>,
        repository: Arc<MemoryRepository>,
        persist: PersistPolicy,
    ) -> ModerationService {
        ModerationService::new(
            staffed_state(),
            CommandDispatcher::default(),
            transport,
            repository,
            persist,
        )
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_roll_back() {
        let transport = Arc::new(RecordingTransport::new().failing_on("remove_member"));
        let repository = Arc::new(MemoryRepository::default());
        let service = service(transport.clone(), repository, PersistPolicy::OnShutdown);
        let troll = Identity::new("5", "troll");

        service.handle_command(&command("/ban spam", Some(troll.clone()))).await;

        assert!(service.snapshot().await.is_banned(&troll.id));
        // The announcement still goes out after the kick failed.
        assert_eq!(
            transport.delivered(),
            vec![Outbound::send_to_chat(
                &ChatId::new("-100"),
                "@troll was banned: spam"
            )]
        );
    }

    #[tokio::test]
    async fn test_report_fan_out_survives_single_failure() {
        let transport = Arc::new(RecordingTransport::new().failing_on("send_direct:1"));
        let repository = Arc::new(MemoryRepository::default());
        let service = service(transport.clone(), repository, PersistPolicy::OnShutdown);

        service.handle_command(&command("/report", None)).await;

        assert_eq!(
            transport.delivered(),
            vec![Outbound::send_direct(
                &UserId::new("2"),
                "Message was reported by mod in Lounge!"
            )]
        );
    }

    #[tokio::test]
    async fn test_persist_after_each_mutation() {
        let transport = Arc::new(RecordingTransport::new());
        let repository = Arc::new(MemoryRepository::default());
        let service = service(transport, repository.clone(), PersistPolicy::AfterEachMutation);
        let user = Identity::new("5", "user");

        service.handle_command(&command("/warn spam", Some(user.clone()))).await;
        service.handle_command(&command("/user", Some(user.clone()))).await;

        let saved = repository.saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].warnings_for(&user.id), ["spam"]);
    }

    #[tokio::test]
    async fn test_on_shutdown_policy_defers_saving() {
        let transport = Arc::new(RecordingTransport::new());
        let repository = Arc::new(MemoryRepository::default());
        let service = service(transport, repository.clone(), PersistPolicy::OnShutdown);

        service
            .handle_command(&command("/warn spam", Some(Identity::new("5", "user"))))
            .await;
        assert!(repository.saved.lock().unwrap().is_empty());

        service.flush().await.unwrap();
        assert_eq!(repository.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_state() {
        let transport = Arc::new(RecordingTransport::new());
        let repository = Arc::new(MemoryRepository {
            fail: true,
            ..Default::default()
        });
        let service = service(transport.clone(), repository, PersistPolicy::AfterEachMutation);
        let user = Identity::new("5", "user");

        service.handle_command(&command("/warn spam", Some(user.clone()))).await;

        assert_eq!(service.snapshot().await.warnings_for(&user.id), ["spam"]);
        assert_eq!(transport.delivered().len(), 1);
        assert!(service.flush().await.is_err());
    }

    #[tokio::test]
    async fn test_handle_text_delivers_custom_reply() {
        let transport = Arc::new(RecordingTransport::new());
        let repository = Arc::new(MemoryRepository::default());
        let service = service(transport.clone(), repository, PersistPolicy::OnShutdown);

        service
            .handle_command(&command("/addcommand faq Read the pins", None))
            .await;
        let reply = service
            .handle_text(&TextEvent::new("!faq", ChatRef::new("-100", "Lounge")))
            .await;

        let expected = Outbound::send_to_chat(&ChatId::new("-100"), "Read the pins");
        assert_eq!(reply, Some(expected.clone()));
        assert_eq!(transport.delivered().last(), Some(&expected));
    }

    #[tokio::test]
    async fn test_start_uses_config() {
        let transport = Arc::new(RecordingTransport::new());
        let repository = Arc::new(MemoryRepository::default());
        repository.save(&staffed_state()).await.unwrap();

        let config = BotConfig {
            trigger_marker: "?".to_string(),
            bot_username: Some("lurker_bot".to_string()),
            ..Default::default()
        };
        let service = ModerationService::start(&config, transport, repository)
            .await
            .unwrap();

        assert_eq!(service.dispatcher().trigger_marker(), "?");
        assert_eq!(service.dispatcher().bot_username(), Some("lurker_bot"));
        assert_eq!(service.snapshot().await, staffed_state());
    }
}
