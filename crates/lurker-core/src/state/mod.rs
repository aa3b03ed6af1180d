//! Moderation state: the aggregate root and its persistence trait.

pub mod model;
pub mod repository;

pub use model::{BanEntry, SessionState, WARNINGS_BEFORE_BAN};
pub use repository::SnapshotRepository;
