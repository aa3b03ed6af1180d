//! Infrastructure layer for Lurker.
//!
//! Persistence of the state snapshot, configuration loading and platform
//! path resolution.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod snapshot_repository;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::snapshot_repository::FileSnapshotRepository;
