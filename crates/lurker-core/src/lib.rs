//! Domain layer for Lurker, a group chat moderation bot.
//!
//! This crate holds the moderation state, the command vocabulary, the
//! messages the bot sends and the traits through which the application layer
//! talks to the chat platform and to durable storage. It performs no I/O.

pub mod chat;
pub mod command;
pub mod config;
pub mod error;
pub mod state;
pub mod user;

// Re-export common error type
pub use error::LurkerError;
