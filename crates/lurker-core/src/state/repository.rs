//! Snapshot repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::model::SessionState;

/// Durable storage for whole-state snapshots.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Loads the last persisted snapshot.
    ///
    /// A missing snapshot yields an empty state. A snapshot that exists but
    /// cannot be parsed is an error, never an empty state.
    async fn load(&self) -> Result<SessionState>;

    /// Replaces the persisted snapshot with `state`.
    async fn save(&self, state: &SessionState) -> Result<()>;
}
