//! Chat domain module.
//!
//! Everything the moderation core exchanges with the messaging platform:
//! chat/message references, inbound events, outbound actions and the
//! transport trait that carries them out.
//!
//! # Module Structure
//!
//! - `model`: Chat and message references (`ChatRef`, `RepliedMessage`)
//! - `event`: Inbound events (`CommandEvent`, `TextEvent`)
//! - `outbound`: Side effects to perform on the platform (`Outbound`)
//! - `transport`: Platform client trait (`ChatTransport`)

mod event;
mod model;
mod outbound;
mod transport;

// Re-export public API
pub use event::{COMMAND_PREFIX, CommandEvent, TextEvent, split_argument};
pub use model::{ChatId, ChatRef, MessageId, RepliedMessage};
pub use outbound::Outbound;
pub use transport::ChatTransport;
