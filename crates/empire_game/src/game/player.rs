//! Roster entries.

use crate::PlayerId;
use derive_getters::Getters;

/// A participant on the roster.
///
/// Eliminated players are dropped from the roster rather than flagged.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Player {
    /// Player identifier.
    id: PlayerId,
    /// Secret alias, once registered.
    alias: Option<String>,
    /// Consecutive turns that timed out.
    missed_turns: u32,
}

impl Player {
    /// Creates a roster entry with no alias and no misses.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            alias: None,
            missed_turns: 0,
        }
    }

    /// Returns true once the player has registered an alias.
    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub(crate) fn set_alias(&mut self, alias: String) {
        self.alias = Some(alias);
    }

    pub(crate) fn record_miss(&mut self) -> u32 {
        self.missed_turns += 1;
        self.missed_turns
    }

    pub(crate) fn reset_misses(&mut self) {
        self.missed_turns = 0;
    }
}
