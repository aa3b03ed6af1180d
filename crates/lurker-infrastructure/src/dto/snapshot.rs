//! State snapshot DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Four sections `staff`, `warnings`, `bans`, `custom`. Snapshots
//!   written before versioning was introduced share this layout and carry no
//!   `version` field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use version_migrate::{FromDomain, IntoDomain, Versioned};

use lurker_core::state::{BanEntry, SessionState};
use lurker_core::user::UserId;

/// Entity name the snapshot migration path is registered under.
pub const SNAPSHOT_ENTITY: &str = "snapshot";

/// Schema version assumed for snapshots without a `version` field.
pub const LEGACY_SNAPSHOT_VERSION: &str = "1.0.0";

/// Top-level keys a snapshot document may contain.
pub const SNAPSHOT_KEYS: [&str; 5] = ["version", "staff", "warnings", "bans", "custom"];

// ============================================================================
// BanEntry DTOs
// ============================================================================

/// Ban record DTO V1.0.0
///
/// `name` is `null` in snapshots the original bot wrote for users without a
/// username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BanEntryV1_0_0 {
    /// Display name of the user at ban time
    #[serde(default)]
    pub name: Option<String>,
}

impl BanEntryV1_0_0 {
    /// Converts to the domain record, falling back to the user id when no
    /// name was stored.
    fn into_entry(self, id: &str) -> BanEntry {
        BanEntry {
            display_name: self.name.unwrap_or_else(|| id.to_string()),
        }
    }
}

impl From<&BanEntry> for BanEntryV1_0_0 {
    fn from(entry: &BanEntry) -> Self {
        BanEntryV1_0_0 {
            name: Some(entry.display_name.clone()),
        }
    }
}

// ============================================================================
// Snapshot DTOs
// ============================================================================

/// Session state snapshot DTO V1.0.0
///
/// All sections are optional on disk and default to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SnapshotV1_0_0 {
    /// Staff user ids
    #[serde(default)]
    pub staff: Vec<String>,
    /// Warning reasons by user id, oldest first
    #[serde(default)]
    pub warnings: BTreeMap<String, Vec<String>>,
    /// Banned users by user id
    #[serde(default)]
    pub bans: BTreeMap<String, BanEntryV1_0_0>,
    /// Custom command texts by token
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

/// Convert SnapshotV1_0_0 DTO to domain model
impl IntoDomain<SessionState> for SnapshotV1_0_0 {
    fn into_domain(self) -> SessionState {
        let mut state = SessionState {
            staff: self.staff.into_iter().map(UserId::from).collect(),
            warnings: self
                .warnings
                .into_iter()
                .map(|(id, reasons)| (UserId::from(id), reasons))
                .collect(),
            bans: self
                .bans
                .into_iter()
                .map(|(id, entry)| {
                    let entry = entry.into_entry(&id);
                    (UserId::from(id), entry)
                })
                .collect(),
            custom: self.custom,
        };
        state.dedup_staff();
        state
    }
}

/// Convert domain model to SnapshotV1_0_0 DTO (for version-migrate save support)
impl FromDomain<SessionState> for SnapshotV1_0_0 {
    fn from_domain(state: SessionState) -> Self {
        SnapshotV1_0_0 {
            staff: state.staff.iter().map(|id| id.as_str().to_string()).collect(),
            warnings: state
                .warnings
                .into_iter()
                .map(|(id, reasons)| (id.as_str().to_string(), reasons))
                .collect(),
            bans: state
                .bans
                .iter()
                .map(|(id, entry)| (id.as_str().to_string(), entry.into()))
                .collect(),
            custom: state.custom,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for snapshot entities.
///
/// # Migration Path
///
/// - V1.0 → SessionState: Converts DTO to domain model
///
/// # Example
///
/// ```ignore
/// let migrator = create_snapshot_migrator();
/// let state: SessionState = migrator.load_flat_from("snapshot", json_value)?;
/// ```
pub fn create_snapshot_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0 -> SessionState
    let snapshot_path = version_migrate::Migrator::define(SNAPSHOT_ENTITY)
        .from::<SnapshotV1_0_0>()
        .into_with_save::<SessionState>();

    migrator
        .register(snapshot_path)
        .expect("Failed to register snapshot migration path");

    migrator
}
