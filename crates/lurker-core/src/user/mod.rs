//! User domain module.
//!
//! # Usage
//!
//! ```ignore
//! use lurker_core::user::{Identity, UserId};
//! ```

mod model;

// Re-export public API
pub use model::{Identity, UserId};
