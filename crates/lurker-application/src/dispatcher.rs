//! Command dispatcher.
//!
//! Maps an inbound command to one transition of [`SessionState`] and the
//! outbound actions announcing it. The dispatcher owns no state: the caller
//! passes the state in and is responsible for serializing calls.

use lurker_core::chat::{ChatRef, ChatTransport, CommandEvent, Outbound, TextEvent, split_argument};
use lurker_core::command::messages;
use lurker_core::command::{Command, normalize_custom_token};
use lurker_core::config::DEFAULT_TRIGGER_MARKER;
use lurker_core::state::{SessionState, WARNINGS_BEFORE_BAN};
use lurker_core::user::Identity;

/// Why a command was refused before it touched the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The invoker is not on the staff roster.
    NotStaff,
    /// The command must be sent as a reply and was not.
    NoTarget,
    /// The argument is malformed; carries the usage text shown to the chat.
    Invalid(&'static str),
}

/// Result of dispatching one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Actions to deliver, in order, after the state change is committed.
    pub actions: Vec<Outbound>,
    /// Whether the state was changed.
    pub mutated: bool,
}

impl DispatchOutcome {
    fn say(&mut self, chat: &ChatRef, text: impl Into<String>) {
        self.actions.push(Outbound::send_to_chat(&chat.id, text));
    }
}

type HandlerResult = std::result::Result<(), Rejection>;

/// Interprets commands and custom-command triggers against a `SessionState`.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    trigger_marker: String,
    bot_username: Option<String>,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_MARKER, None)
    }
}

impl CommandDispatcher {
    pub fn new(trigger_marker: impl Into<String>, bot_username: Option<String>) -> Self {
        Self {
            trigger_marker: trigger_marker.into(),
            bot_username,
        }
    }

    pub fn trigger_marker(&self) -> &str {
        &self.trigger_marker
    }

    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }

    /// Runs one command.
    ///
    /// The staff gate runs before anything else reads or writes the state.
    /// Rejections never surface as errors: a non-staff invoker gets a denial
    /// notification, a missing reply target is silently ignored and a
    /// malformed argument gets a usage hint.
    pub async fn dispatch(
        &self,
        state: &mut SessionState,
        event: &CommandEvent,
        transport: &dyn ChatTransport,
    ) -> DispatchOutcome {
        tracing::info!(
            "Received command {} from {} ({}): {:?}",
            event.command,
            event.invoker.display_name,
            event.invoker.id,
            event.argument
        );

        let mut outcome = DispatchOutcome::default();

        let Some(command) = Command::from_token(&event.command) else {
            tracing::debug!("Ignoring unknown command {:?}", event.command);
            return outcome;
        };

        let result = if command.is_staff_only() && !state.is_staff(&event.invoker.id) {
            Err(Rejection::NotStaff)
        } else {
            self.run(command, state, event, transport, &mut outcome).await
        };

        match result {
            Ok(()) => {}
            Err(Rejection::NotStaff) => {
                tracing::warn!(
                    "{} ({}) is not staff, refusing /{}",
                    event.invoker.display_name,
                    event.invoker.id,
                    command
                );
                outcome.say(&event.chat, messages::not_staff(&event.invoker));
            }
            Err(Rejection::NoTarget) => {
                tracing::debug!("/{} sent without a reply target, ignoring", command);
            }
            Err(Rejection::Invalid(usage)) => {
                tracing::debug!("/{} rejected: malformed argument {:?}", command, event.argument);
                outcome.say(&event.chat, usage);
            }
        }

        outcome
    }

    async fn run(
        &self,
        command: Command,
        state: &mut SessionState,
        event: &CommandEvent,
        transport: &dyn ChatTransport,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let target = if command.requires_target() {
            Some(event.target().ok_or(Rejection::NoTarget)?)
        } else {
            None
        };

        match (command, target) {
            (Command::Warn, Some(target)) => {
                self.warn(state, &event.chat, target, &event.argument, outcome)
            }
            (Command::Unwarn, Some(target)) => self.unwarn(state, &event.chat, target, outcome),
            (Command::ClearWarnings, Some(target)) => {
                self.clear_warnings(state, &event.chat, target, outcome)
            }
            (Command::Ban, Some(target)) => {
                self.ban(state, &event.chat, target, &event.argument, outcome)
            }
            (Command::Unban, Some(target)) => self.unban(state, &event.chat, target, outcome),
            (Command::UserStatus, _) => self.user_status(state, event, outcome),
            (Command::ListStaff, _) => self.list_staff(state, &event.chat, transport, outcome).await,
            (Command::Report, _) => self.report(state, event, outcome),
            (Command::AddCustomCommand, _) => {
                self.add_custom_command(state, &event.chat, &event.argument, outcome)
            }
            (Command::RemoveCustomCommand, _) => {
                self.remove_custom_command(state, &event.chat, &event.argument, outcome)
            }
            (Command::Help, _) => {
                outcome.say(&event.chat, messages::HELP_TEXT);
                Ok(())
            }
            (_, None) => Err(Rejection::NoTarget),
        }
    }

    // ============================================================================
    // Warnings
    // ============================================================================

    fn warn(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        target: &Identity,
        reason: &str,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let count = state.add_warning(&target.id, reason);
        outcome.mutated = true;
        outcome.say(chat, messages::warned(target, reason, count));

        // Only the warning that reaches the threshold bans; later ones don't.
        if count == WARNINGS_BEFORE_BAN {
            tracing::info!("{} reached {} warnings, banning", target.id, count);
            self.ban(state, chat, target, messages::AUTO_BAN_REASON, outcome)?;
        }
        Ok(())
    }

    fn unwarn(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        target: &Identity,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let had_warnings = !state.warnings_for(&target.id).is_empty();
        let remaining = state.remove_last_warning(&target.id);
        outcome.mutated |= had_warnings;
        outcome.say(chat, messages::warnings_left(target, remaining));
        Ok(())
    }

    fn clear_warnings(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        target: &Identity,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        outcome.mutated |= state.clear_warnings(&target.id);
        outcome.say(chat, messages::warnings_cleared(target));
        Ok(())
    }

    // ============================================================================
    // Bans
    // ============================================================================

    /// Bans `target`. Shared by `/ban` and the warning cascade, so it assumes
    /// the invoker already passed the staff gate.
    fn ban(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        target: &Identity,
        reason: &str,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        if state.is_staff(&target.id) {
            outcome.say(chat, messages::BAN_STAFF_REFUSAL);
            return Ok(());
        }

        let unchanged = state
            .bans
            .get(&target.id)
            .is_some_and(|entry| entry.display_name == target.display_name);
        state.ban(target);
        outcome.mutated |= !unchanged;

        outcome.actions.push(Outbound::RemoveMember {
            chat: chat.id.clone(),
            user: target.id.clone(),
        });
        outcome.say(chat, messages::banned(target, reason));
        Ok(())
    }

    fn unban(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        target: &Identity,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        outcome.mutated |= state.unban(&target.id);
        outcome.actions.push(Outbound::RestoreMember {
            chat: chat.id.clone(),
            user: target.id.clone(),
        });
        outcome.say(chat, messages::unbanned(target));
        Ok(())
    }

    // ============================================================================
    // Queries
    // ============================================================================

    fn user_status(
        &self,
        state: &SessionState,
        event: &CommandEvent,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let target = event.target().unwrap_or(&event.invoker);
        let report = messages::user_status(
            target,
            state.is_banned(&target.id),
            state.warnings_for(&target.id),
        );
        outcome.say(&event.chat, report);
        Ok(())
    }

    async fn list_staff(
        &self,
        state: &SessionState,
        chat: &ChatRef,
        transport: &dyn ChatTransport,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let mut msg = String::from(messages::STAFF_HEADER);
        for id in &state.staff {
            match transport.resolve_display_name(&chat.id, id).await {
                Ok(Some(name)) => msg.push_str(&messages::staff_line(&name)),
                Ok(None) => msg.push_str(&messages::staff_missing_line(id)),
                Err(e) => {
                    tracing::warn!("Failed to resolve staff member {}: {}", id, e);
                    msg.push_str(&messages::staff_missing_line(id));
                }
            }
        }
        outcome.say(chat, msg);
        Ok(())
    }

    /// Fans the report out to every staff member, forwarding the replied-to
    /// message when there is one.
    fn report(
        &self,
        state: &SessionState,
        event: &CommandEvent,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let text = messages::reported(&event.invoker, &event.chat.title);
        for staff_id in &state.staff {
            outcome.actions.push(Outbound::send_direct(staff_id, text.clone()));
            if let Some(reply) = &event.reply_to {
                outcome.actions.push(Outbound::Forward {
                    from_chat: event.chat.id.clone(),
                    message: reply.id.clone(),
                    to: staff_id.clone(),
                });
            }
        }
        Ok(())
    }

    // ============================================================================
    // Custom commands
    // ============================================================================

    fn add_custom_command(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        argument: &str,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let (token, text) = split_argument(argument);
        let token = self.custom_token(token);
        if token.is_empty() || text.trim().is_empty() {
            return Err(Rejection::Invalid(messages::ADD_COMMAND_USAGE));
        }

        let previous = state.set_custom_command(token.clone(), text);
        outcome.mutated |= previous.as_deref() != Some(text);
        outcome.say(chat, messages::custom_command_defined(&token, text));
        Ok(())
    }

    fn remove_custom_command(
        &self,
        state: &mut SessionState,
        chat: &ChatRef,
        argument: &str,
        outcome: &mut DispatchOutcome,
    ) -> HandlerResult {
        let token = self.custom_token(argument.trim());
        match state.remove_custom_command(&token) {
            Some(_) => {
                outcome.mutated = true;
                outcome.say(chat, messages::custom_command_removed(&token));
            }
            None => outcome.say(chat, messages::custom_command_not_found(&token)),
        }
        Ok(())
    }

    /// Looks up a custom command trigger in a plain chat message.
    ///
    /// Returns the reply echoing the stored text, or `None` when the message
    /// is not a trigger or names no known command.
    pub fn on_text(&self, state: &SessionState, event: &TextEvent) -> Option<Outbound> {
        if !event.text.starts_with(self.trigger_marker.as_str()) {
            return None;
        }

        let rest = event.text.trim_start_matches(self.trigger_marker.as_str());
        let Some(token) = rest.split_whitespace().next() else {
            tracing::debug!("Ignoring bare trigger marker");
            return None;
        };

        let token = normalize_custom_token(token);
        match state.custom_command(&token) {
            Some(text) if !text.is_empty() => Some(Outbound::send_to_chat(&event.chat.id, text)),
            _ => {
                tracing::debug!("No text for custom command {:?}", token);
                None
            }
        }
    }

    /// Normalizes a token given to `/addcommand` or `/removecommand`, dropping
    /// any trigger markers the staff member typed along with it.
    fn custom_token(&self, token: &str) -> String {
        normalize_custom_token(token.trim_start_matches(self.trigger_marker.as_str()))
    }
}
