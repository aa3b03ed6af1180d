//! Moderation state domain model.
//!
//! `SessionState` is the aggregate root holding every piece of data the bot
//! remembers between restarts: the staff roster, warnings, bans and custom
//! commands. It performs no authorization itself; callers decide who may
//! mutate what.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::user::{Identity, UserId};

/// Number of warnings that triggers an automatic ban.
pub const WARNINGS_BEFORE_BAN: usize = 3;

/// What is remembered about a banned user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanEntry {
    /// Display name at the time of the ban.
    pub display_name: String,
}

/// The complete mutable state of one bot instance.
///
/// # Fields
///
/// * `staff` - Identities allowed to run moderation commands. Kept in
///   insertion order without duplicates; only edited out-of-band.
/// * `warnings` - Warning reasons per user, oldest first.
/// * `bans` - Currently banned users.
/// * `custom` - Custom command token (lowercase, no marker) to reply text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub staff: Vec<UserId>,
    pub warnings: BTreeMap<UserId, Vec<String>>,
    pub bans: BTreeMap<UserId, BanEntry>,
    pub custom: BTreeMap<String, String>,
}

impl SessionState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Staff roster
    // ============================================================================

    /// Returns true iff `user` is on the staff roster.
    pub fn is_staff(&self, user: &UserId) -> bool {
        self.staff.contains(user)
    }

    /// Adds `user` to the staff roster. Returns false if already present.
    pub fn add_staff(&mut self, user: UserId) -> bool {
        if self.is_staff(&user) {
            return false;
        }
        self.staff.push(user);
        true
    }

    /// Removes `user` from the staff roster. Returns false if absent.
    pub fn remove_staff(&mut self, user: &UserId) -> bool {
        let before = self.staff.len();
        self.staff.retain(|id| id != user);
        self.staff.len() != before
    }

    // ============================================================================
    // Warnings
    // ============================================================================

    /// Warning reasons recorded for `user`, oldest first.
    pub fn warnings_for(&self, user: &UserId) -> &[String] {
        self.warnings.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends a warning and returns the new warning count.
    pub fn add_warning(&mut self, user: &UserId, reason: impl Into<String>) -> usize {
        let list = self.warnings.entry(user.clone()).or_default();
        list.push(reason.into());
        list.len()
    }

    /// Drops the most recent warning, if any, and returns the remaining count.
    ///
    /// A user whose last warning is removed disappears from the record.
    pub fn remove_last_warning(&mut self, user: &UserId) -> usize {
        let Some(list) = self.warnings.get_mut(user) else {
            return 0;
        };
        list.pop();
        let remaining = list.len();
        if remaining == 0 {
            self.warnings.remove(user);
        }
        remaining
    }

    /// Forgets every warning of `user`. Returns true if there were any.
    pub fn clear_warnings(&mut self, user: &UserId) -> bool {
        self.warnings.remove(user).is_some()
    }

    // ============================================================================
    // Bans
    // ============================================================================

    pub fn is_banned(&self, user: &UserId) -> bool {
        self.bans.contains_key(user)
    }

    /// Records a ban. Returns false if the user was already banned; the stored
    /// display name is refreshed either way.
    pub fn ban(&mut self, user: &Identity) -> bool {
        self.bans
            .insert(
                user.id.clone(),
                BanEntry {
                    display_name: user.display_name.clone(),
                },
            )
            .is_none()
    }

    /// Lifts a ban. Returns false if the user was not banned.
    pub fn unban(&mut self, user: &UserId) -> bool {
        self.bans.remove(user).is_some()
    }

    // ============================================================================
    // Custom commands
    // ============================================================================

    pub fn custom_command(&self, token: &str) -> Option<&str> {
        self.custom.get(token).map(String::as_str)
    }

    /// Defines or overwrites a custom command, returning the previous text.
    pub fn set_custom_command(
        &mut self,
        token: impl Into<String>,
        text: impl Into<String>,
    ) -> Option<String> {
        self.custom.insert(token.into(), text.into())
    }

    /// Removes a custom command, returning its text if it existed.
    pub fn remove_custom_command(&mut self, token: &str) -> Option<String> {
        self.custom.remove(token)
    }

    /// Collapses duplicate staff entries, keeping the first occurrence.
    pub fn dedup_staff(&mut self) {
        let mut seen = Vec::with_capacity(self.staff.len());
        self.staff.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
    }

    /// Returns true if all four sections are empty.
    pub fn is_empty(&self) -> bool {
        self.staff.is_empty()
            && self.warnings.is_empty()
            && self.bans.is_empty()
            && self.custom.is_empty()
    }
}
