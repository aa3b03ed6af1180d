//! Bot command definitions.
//!
//! - `model`: the `Command` enum and token helpers
//! - `messages`: user-facing notification texts and the help page

pub mod messages;
pub mod model;

pub use model::{Command, normalize_custom_token};
