//! Interactive console chat.
//!
//! Simulates a single group chat on the terminal: every input line is a
//! message from some user, commands go through the moderation service and the
//! bot's reactions are printed by [`ConsoleTransport`].

mod line;
mod transport;

pub use line::{ConsoleLine, parse_line};
pub use transport::{ConsoleTransport, Members};

use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::HashMap;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use strum::IntoEnumIterator;

use lurker_application::ModerationService;
use lurker_core::chat::{COMMAND_PREFIX, ChatRef, CommandEvent, MessageId, RepliedMessage, TextEvent};
use lurker_core::command::Command;
use lurker_core::user::{Identity, UserId};

/// Chat id used for the console chat.
pub const CONSOLE_CHAT_ID: &str = "console";

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: Command::iter()
                .map(|command| format!("{}{}", COMMAND_PREFIX, command.token()))
                .collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        // Complete the last word so prefixes like `@1:mod ^2 /wa` work too.
        let start = line.rfind(char::is_whitespace).map_or(0, |idx| idx + 1);
        let word = &line[start..];

        if word.starts_with(COMMAND_PREFIX) {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(word))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((start, candidates))
        } else {
            Ok((start, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.contains(COMMAND_PREFIX) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        let word = line.rsplit(char::is_whitespace).next().unwrap_or(line);

        if word.starts_with(COMMAND_PREFIX) {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(word) && cmd.len() > word.len())
                .map(|cmd| cmd[word.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Who is talking and which messages the chat has seen so far.
struct ConsoleChat {
    chat: ChatRef,
    speaker: Identity,
    members: Members,
    last_message: HashMap<UserId, MessageId>,
    next_message: u64,
}

impl ConsoleChat {
    fn new(title: &str, members: Members) -> Self {
        Self {
            chat: ChatRef::new(CONSOLE_CHAT_ID, title),
            speaker: Identity::new("0", "console"),
            members,
            last_message: HashMap::new(),
            next_message: 1,
        }
    }

    /// Records that `user` is in the chat under `display_name`.
    fn seen(&self, user: &Identity) {
        if let Ok(mut members) = self.members.lock() {
            members.insert(user.id.clone(), user.display_name.clone());
        }
    }

    /// Allocates an id for a new message by the current speaker.
    fn post(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message.to_string());
        self.next_message += 1;
        self.last_message.insert(self.speaker.id.clone(), id.clone());
        id
    }

    /// Resolves the message a reply points at: the author's latest message.
    fn reply(&self, author: Identity) -> RepliedMessage {
        let id = self
            .last_message
            .get(&author.id)
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| "0".to_string());
        self.seen(&author);
        RepliedMessage::new(id, author)
    }
}

/// Runs the console chat until `quit`, end of input or Ctrl-C.
pub async fn repl(service: &ModerationService, title: &str, members: Members) -> Result<()> {
    let mut chat = ConsoleChat::new(title, members);
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", format!("=== Lurker console: {} ===", title).bright_magenta().bold());
    println!(
        "{}",
        "Lines are messages. Prefix '@id:name' to speak as a user, '^id:name' to reply to them. 'quit' exits."
            .bright_black()
    );
    println!();

    loop {
        let prompt = format!("{}> ", chat.speaker.display_name);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let parsed = match parse_line(trimmed) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("{}", format!("Invalid line: {}", e).red());
                        continue;
                    }
                };

                handle_line(service, &mut chat, parsed).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Exiting...".yellow());
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn handle_line(service: &ModerationService, chat: &mut ConsoleChat, line: ConsoleLine) {
    if let Some(speaker) = line.speaker {
        chat.speaker = speaker;
    }
    chat.seen(&chat.speaker);

    if line.text.is_empty() {
        return;
    }

    let reply_to = line.reply_to.map(|author| chat.reply(author));
    chat.post();

    if line.text.starts_with(COMMAND_PREFIX) {
        let dispatcher = service.dispatcher();
        match CommandEvent::parse(
            &line.text,
            chat.speaker.clone(),
            chat.chat.clone(),
            reply_to,
            dispatcher.bot_username(),
        ) {
            Some(event) => {
                service.handle_command(&event).await;
            }
            None => tracing::debug!("Ignoring {:?}", line.text),
        }
    } else {
        service
            .handle_text(&TextEvent::new(line.text, chat.chat.clone()))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reply_points_at_latest_message_of_author() {
        let members: Members = Arc::default();
        let mut chat = ConsoleChat::new("Test", members.clone());

        chat.speaker = Identity::new("2", "troll");
        chat.post();
        let second = chat.post();

        chat.speaker = Identity::new("1", "mod");
        let reply = chat.reply(Identity::new("2", "troll"));
        assert_eq!(reply.id, second);
        assert_eq!(reply.author.display_name, "troll");
        assert_eq!(
            members.lock().unwrap().get(&UserId::new("2")).map(String::as_str),
            Some("troll")
        );

        let unknown = chat.reply(Identity::new("3", "ghost"));
        assert_eq!(unknown.id.as_str(), "0");
    }

    #[test]
    fn test_helper_lists_every_command() {
        let helper = CliHelper::new();
        assert!(helper.commands.contains(&"/warn".to_string()));
        assert!(helper.commands.contains(&"/removecommand".to_string()));
        assert_eq!(helper.commands.len(), Command::iter().count());
    }
}
