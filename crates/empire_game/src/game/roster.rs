//! Roster management: join, leave, start and cancel.

use super::events::GameEvent;
use super::phase::{DeadlineKind, Phase};
use super::player::Player;
use super::session::GameSession;
use crate::{GameError, PlayerId};
use tracing::{info, instrument, warn};

impl GameSession {
    /// Adds a player to the roster during setup.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn join(&mut self, player: PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if !self.phase.is_setup() {
            warn!(player = %player, phase = %self.phase, "Join outside setup");
            return Err(GameError::NotJoinable);
        }
        if self.roster.len() >= *self.config.max_players() {
            warn!(player = %player, roster_size = self.roster.len(), "Roster full");
            return Err(GameError::Full);
        }
        if self.position(&player).is_some() {
            return Err(GameError::AlreadyJoined);
        }

        self.roster.push(Player::new(player.clone()));
        info!(player = %player, roster_size = self.roster.len(), "Player joined");
        self.verified(vec![GameEvent::PlayerJoined {
            player,
            roster_size: self.roster.len(),
        }])
    }

    /// Removes a player from the roster during setup.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn leave(&mut self, player: &PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if !self.phase.is_setup() {
            warn!(player = %player, phase = %self.phase, "Leave outside setup");
            return Err(GameError::NotJoinable);
        }
        let idx = self.position(player).ok_or(GameError::NotAPlayer)?;

        self.roster.remove(idx);
        info!(player = %player, roster_size = self.roster.len(), "Player left");
        self.verified(vec![GameEvent::PlayerLeft {
            player: player.clone(),
            roster_size: self.roster.len(),
        }])
    }

    /// Closes setup: shuffles the turn order and opens alias registration.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn start(&mut self, requester: &PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if requester != &self.host {
            warn!(requester = %requester, "Non-host tried to start");
            return Err(GameError::NotHost);
        }
        if !self.phase.is_setup() {
            return Err(GameError::AlreadyStarted);
        }
        if self.roster.len() < *self.config.min_players() {
            warn!(roster_size = self.roster.len(), "Too few players to start");
            return Err(GameError::TooFewPlayers);
        }

        let players: Vec<PlayerId> = self.roster.iter().map(|p| p.id().clone()).collect();
        let mut order = players.clone();
        self.random.shuffle_players(&mut order);
        self.turn_order = order;
        self.current_turn = 0;
        self.generation += 1;
        self.phase = Phase::AliasCollection;
        info!(
            generation = self.generation,
            turn_order = ?self.turn_order,
            "Game started, collecting aliases"
        );

        let mut events = vec![GameEvent::AliasPhaseOpened {
            players,
            deadline: self.config.alias_deadline(),
        }];
        events.push(self.arm_deadline(DeadlineKind::AliasPhase));
        self.verified(events)
    }

    /// Tears the game down at the host's request.
    #[instrument(skip(self), fields(room = %self.room))]
    pub fn cancel(&mut self, requester: &PlayerId) -> Result<Vec<GameEvent>, GameError> {
        if requester != &self.host {
            warn!(requester = %requester, "Non-host tried to cancel");
            return Err(GameError::NotHost);
        }
        if self.phase.is_ended() {
            return Err(GameError::NoSession);
        }

        self.generation += 1;
        self.phase = Phase::Ended;
        info!(generation = self.generation, "Game cancelled by host");

        let mut events: Vec<GameEvent> = self.clear_deadline().into_iter().collect();
        events.push(GameEvent::Cancelled);
        self.verified(events)
    }
}
