//! Domain events emitted by session operations.
//!
//! Operations never talk to collaborators directly. They return the events
//! they produced and the registry turns those into notifications, prompts,
//! write-permission changes and deadline scheduling.

use super::phase::{DeadlineStamp, Outcome};
use crate::PlayerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a player left the game involuntarily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EliminationReason {
    /// Another player guessed their alias.
    Caught,
    /// Too many consecutive turns timed out.
    MissedTurns,
}

/// Something that happened to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The session opened for joins.
    SetupOpened {
        /// The host who may start or cancel.
        host: PlayerId,
        /// Roster capacity.
        max_players: usize,
    },
    /// A player joined the roster.
    PlayerJoined {
        /// The new player.
        player: PlayerId,
        /// Roster size after joining.
        roster_size: usize,
    },
    /// A player left the roster during setup.
    PlayerLeft {
        /// The departing player.
        player: PlayerId,
        /// Roster size after leaving.
        roster_size: usize,
    },
    /// The game started and players must register aliases.
    AliasPhaseOpened {
        /// Everyone who must register.
        players: Vec<PlayerId>,
        /// How long they have.
        deadline: Duration,
    },
    /// A player registered an alias. The alias itself is not carried.
    AliasSaved {
        /// The registering player.
        player: PlayerId,
    },
    /// Players without an alias were removed when the window closed.
    PlayersDisqualified {
        /// Removed players, in roster order.
        players: Vec<PlayerId>,
    },
    /// A new turn round began.
    TurnStarted {
        /// Player who must guess.
        player: PlayerId,
        /// Active players in roster order.
        players: Vec<PlayerId>,
        /// Registered aliases, shuffled.
        aliases: Vec<String>,
    },
    /// A guess named the target's alias.
    GuessCorrect {
        /// The guessing player, who keeps the turn.
        guesser: PlayerId,
        /// The caught player.
        target: PlayerId,
    },
    /// A guess missed.
    GuessWrong {
        /// The guessing player.
        guesser: PlayerId,
        /// Player who acts next.
        next: PlayerId,
    },
    /// A turn expired without a guess.
    TurnTimedOut {
        /// Owner of the expired turn.
        player: PlayerId,
        /// Consecutive misses after this one.
        missed_turns: u32,
    },
    /// A player was removed from the game.
    PlayerEliminated {
        /// The removed player.
        player: PlayerId,
        /// Why they were removed.
        reason: EliminationReason,
    },
    /// A deadline was armed; any earlier one is void.
    DeadlineArmed {
        /// Identity to fire with.
        stamp: DeadlineStamp,
        /// Delay until it fires.
        after: Duration,
    },
    /// The pending deadline was voided without replacement.
    DeadlineCleared,
    /// The game finished.
    GameOver {
        /// Who won, if anyone.
        outcome: Outcome,
    },
    /// The host cancelled the game.
    Cancelled,
}
