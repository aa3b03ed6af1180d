//! Application layer for Lurker.
//!
//! This crate turns inbound chat events into state transitions and outbound
//! actions, coordinating the domain model with the transport and snapshot
//! storage.

pub mod dispatcher;
pub mod service;

#[cfg(test)]
mod testing;

pub use dispatcher::{CommandDispatcher, DispatchOutcome, Rejection};
pub use service::ModerationService;
