//! Session phases and the stamps that tie deadlines to them.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a game session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIs,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Constructed but not yet open for joins.
    Idle,
    /// Players may join and leave.
    Setup,
    /// Players register their secret aliases.
    AliasCollection,
    /// Players take turns guessing aliases.
    Guessing,
    /// Terminal: won, cancelled, or aborted.
    Ended,
}

/// What a pending deadline closes when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeadlineKind {
    /// End of the alias registration window.
    AliasPhase,
    /// End of the current player's turn.
    Turn,
}

/// Identity of one scheduled deadline.
///
/// `generation` changes on every start/cancel/reset; `ticket` changes on
/// every deadline armed. A fire is applied only if both match the session's
/// pending deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadlineStamp {
    /// Session generation when the deadline was armed.
    pub generation: u64,
    /// Per-session sequence number of the deadline.
    pub ticket: u64,
    /// Which phase the deadline closes.
    pub kind: DeadlineKind,
}

/// Outcome of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The last player standing.
    Winner(crate::PlayerId),
    /// Nobody remained.
    NoPlayersLeft,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<&crate::PlayerId> {
        match self {
            Outcome::Winner(player) => Some(player),
            Outcome::NoPlayersLeft => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{} wins", player),
            Outcome::NoPlayersLeft => write!(f, "No players left"),
        }
    }
}
