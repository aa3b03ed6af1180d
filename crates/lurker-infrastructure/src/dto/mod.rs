//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//! - **PATCH (1.0.X)**: Backward-compatible fixes (not typically used for schema)
//!
//! ### Snapshot Version History
//! - **1.0.0**: Initial schema (`staff`, `warnings`, `bans`, `custom`)

mod snapshot;

// Re-export snapshot DTOs and migrator
pub use snapshot::{
    BanEntryV1_0_0, LEGACY_SNAPSHOT_VERSION, SNAPSHOT_ENTITY, SNAPSHOT_KEYS, SnapshotV1_0_0,
    create_snapshot_migrator,
};
