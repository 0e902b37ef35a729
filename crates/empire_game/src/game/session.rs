//! The per-room game session and its lifecycle.
//!
//! A [`GameSession`] is a plain state machine: every operation validates,
//! mutates, re-checks the session invariants and returns the
//! [`GameEvent`]s it produced. Deadlines are requested through
//! [`GameEvent::DeadlineArmed`] and come back through
//! [`GameSession::on_deadline`]; nothing here sleeps or performs I/O.

use super::events::GameEvent;
use super::invariants::{
    AliasesUnique, CurrentTurnInRange, DeadlineMatchesPhase, InvariantSet, RosterWithinCapacity,
    TurnOrderMatchesRoster,
};
use super::phase::{DeadlineKind, DeadlineStamp, Outcome, Phase};
use super::player::Player;
use crate::{GameConfig, GameError, PlayerId, RandomSource, RoomId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// All state of one game in one room.
#[derive(Debug)]
pub struct GameSession {
    pub(super) room: RoomId,
    pub(super) host: PlayerId,
    pub(super) phase: Phase,
    pub(super) generation: u64,
    pub(super) next_ticket: u64,
    pub(super) roster: Vec<Player>,
    pub(super) turn_order: Vec<PlayerId>,
    pub(super) current_turn: usize,
    pub(super) pending: Option<DeadlineStamp>,
    pub(super) outcome: Option<Outcome>,
    pub(super) config: GameConfig,
    pub(super) random: Box<dyn RandomSource>,
}

impl GameSession {
    /// Creates an idle session. Call [`GameSession::open`] to accept joins.
    #[instrument(skip(config, random), fields(room = %room, host = %host))]
    pub fn new(
        room: RoomId,
        host: PlayerId,
        config: GameConfig,
        random: Box<dyn RandomSource>,
    ) -> Self {
        debug!("Creating idle game session");
        Self {
            room,
            host,
            phase: Phase::Idle,
            generation: 0,
            next_ticket: 0,
            roster: Vec::new(),
            turn_order: Vec::new(),
            current_turn: 0,
            pending: None,
            outcome: None,
            config,
            random,
        }
    }

    /// Opens the session for joins.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn open(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !self.phase.is_idle() {
            return Err(GameError::SessionExists);
        }
        self.generation += 1;
        self.phase = Phase::Setup;
        info!(host = %self.host, generation = self.generation, "Session open for joins");
        self.verified(vec![GameEvent::SetupOpened {
            host: self.host.clone(),
            max_players: *self.config.max_players(),
        }])
    }

    /// Applies a fired deadline.
    ///
    /// A stamp that does not match the pending deadline belongs to a
    /// cancelled, replaced or previous-generation deadline and is ignored.
    #[instrument(skip(self), fields(room = %self.room, generation = self.generation))]
    pub fn on_deadline(&mut self, stamp: DeadlineStamp) -> Result<Vec<GameEvent>, GameError> {
        if self.pending != Some(stamp) {
            debug!(?stamp, pending = ?self.pending, "Ignoring stale deadline");
            return Ok(Vec::new());
        }
        self.pending = None;

        let events = match stamp.kind {
            DeadlineKind::AliasPhase => {
                info!("Alias registration window closed");
                self.close_alias_phase()
            }
            DeadlineKind::Turn => self.turn_timed_out(),
        };
        self.verified(events)
    }

    /// Ends the session without a winner after an internal failure or the
    /// room going away.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn abort(&mut self) -> Vec<GameEvent> {
        error!(phase = %self.phase, "Aborting session");
        self.generation += 1;
        self.phase = Phase::Ended;
        self.clear_deadline().into_iter().collect()
    }

    /// Returns an immutable view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            room: self.room.clone(),
            host: self.host.clone(),
            phase: self.phase,
            generation: self.generation,
            players: self
                .roster
                .iter()
                .map(|p| PlayerView {
                    id: p.id().clone(),
                    has_alias: p.has_alias(),
                    missed_turns: *p.missed_turns(),
                })
                .collect(),
            turn_order: self.turn_order.clone(),
            current_player: self.current_player().cloned(),
            outcome: self.outcome.clone(),
        }
    }

    /// Room this session belongs to.
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Player allowed to start and cancel.
    pub fn host(&self) -> &PlayerId {
        &self.host
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Roster in join order.
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Turn order fixed at start, minus eliminated players.
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    /// Deadline that will be honoured when it fires, if any.
    pub fn pending_deadline(&self) -> Option<DeadlineStamp> {
        self.pending
    }

    /// Result of a finished game.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Rules this session plays by.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Looks up a roster entry.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| p.id() == id)
    }

    pub(super) fn position(&self, id: &PlayerId) -> Option<usize> {
        self.roster.iter().position(|p| p.id() == id)
    }

    /// Replaces any pending deadline with a new one of `kind`.
    pub(super) fn arm_deadline(&mut self, kind: DeadlineKind) -> GameEvent {
        self.next_ticket += 1;
        let stamp = DeadlineStamp {
            generation: self.generation,
            ticket: self.next_ticket,
            kind,
        };
        let after = match kind {
            DeadlineKind::AliasPhase => self.config.alias_deadline(),
            DeadlineKind::Turn => self.config.turn_deadline(),
        };
        self.pending = Some(stamp);
        debug!(?stamp, ?after, "Deadline armed");
        GameEvent::DeadlineArmed { stamp, after }
    }

    pub(super) fn clear_deadline(&mut self) -> Option<GameEvent> {
        self.pending.take().map(|_| GameEvent::DeadlineCleared)
    }

    /// Removes a player from the roster and the turn order.
    ///
    /// The current-turn index keeps pointing at the same player when someone
    /// earlier in the order is removed. When the current player is removed it
    /// keeps its numeric position, handing the turn to the next survivor.
    pub(super) fn remove_player(&mut self, id: &PlayerId) {
        self.roster.retain(|p| p.id() != id);
        if let Some(idx) = self.turn_order.iter().position(|p| p == id) {
            self.turn_order.remove(idx);
            if idx < self.current_turn {
                self.current_turn -= 1;
            }
        }
        if self.turn_order.is_empty() {
            self.current_turn = 0;
        } else {
            self.current_turn %= self.turn_order.len();
        }
    }

    /// Runs the invariant set, converting violations into a fatal error.
    pub(super) fn verified(&self, events: Vec<GameEvent>) -> Result<Vec<GameEvent>, GameError> {
        type SessionInvariants = (
            TurnOrderMatchesRoster,
            CurrentTurnInRange,
            AliasesUnique,
            RosterWithinCapacity,
            DeadlineMatchesPhase,
        );
        SessionInvariants::check_all(self).map_err(|violations| {
            let description = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            error!(room = %self.room, %description, "Session invariant violated");
            GameError::InvariantViolation(description)
        })?;
        Ok(events)
    }
}

/// Read-only view of one roster entry. Aliases are never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player identifier.
    pub id: PlayerId,
    /// Whether an alias is registered.
    pub has_alias: bool,
    /// Consecutive timed-out turns.
    pub missed_turns: u32,
}

/// Read-only copy of a session's public state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Room identifier.
    pub room: RoomId,
    /// Host identifier.
    pub host: PlayerId,
    /// Current phase.
    pub phase: Phase,
    /// Current generation.
    pub generation: u64,
    /// Roster in join order.
    pub players: Vec<PlayerView>,
    /// Remaining turn order.
    pub turn_order: Vec<PlayerId>,
    /// Player whose turn it is, while guessing.
    pub current_player: Option<PlayerId>,
    /// Result, once ended.
    pub outcome: Option<Outcome>,
}
