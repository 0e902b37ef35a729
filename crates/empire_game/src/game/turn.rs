//! The guessing turn engine.

use super::events::{EliminationReason, GameEvent};
use super::phase::DeadlineKind;
use super::session::GameSession;
use crate::{GameError, PlayerId};
use tracing::{debug, info, instrument, warn};

impl GameSession {
    /// Player whose turn it is, while guessing.
    pub fn current_player(&self) -> Option<&PlayerId> {
        if !self.phase.is_guessing() || self.turn_order.is_empty() {
            return None;
        }
        self.turn_order
            .get(self.current_turn % self.turn_order.len())
    }

    /// Guesses that `target` registered `guessed_alias`.
    ///
    /// A correct guess eliminates the target and the guesser keeps the turn.
    /// A wrong guess passes the turn along the order. Either way the
    /// guesser's missed-turn count resets.
    #[instrument(skip(self, guessed_alias), fields(room = %self.room))]
    pub fn guess(
        &mut self,
        guesser: &PlayerId,
        target: &PlayerId,
        guessed_alias: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        if !self.phase.is_guessing() {
            return Err(GameError::NotStarted);
        }
        if self.current_player() != Some(guesser) {
            warn!(guesser = %guesser, current = ?self.current_player(), "Guess out of turn");
            return Err(GameError::OutOfTurn);
        }
        let guessed_alias = guessed_alias.trim();
        if !self
            .roster
            .iter()
            .any(|p| p.alias().as_deref() == Some(guessed_alias))
        {
            return Err(GameError::UnknownAlias);
        }
        if target == guesser {
            return Err(GameError::SelfGuess);
        }

        if let Some(idx) = self.position(guesser) {
            self.roster[idx].reset_misses();
        }

        let correct = self
            .player(target)
            .is_some_and(|p| p.alias().as_deref() == Some(guessed_alias));

        let mut events = Vec::new();
        if correct {
            info!(guesser = %guesser, target = %target, "Correct guess");
            self.remove_player(target);
            events.push(GameEvent::GuessCorrect {
                guesser: guesser.clone(),
                target: target.clone(),
            });
            events.push(GameEvent::PlayerEliminated {
                player: target.clone(),
                reason: EliminationReason::Caught,
            });
            if let Some(over) = self.check_for_winner() {
                events.extend(over);
                return self.verified(events);
            }
        } else {
            self.advance_turn();
            let next = self.current_player().cloned().unwrap_or_else(|| guesser.clone());
            info!(guesser = %guesser, target = %target, next = %next, "Wrong guess");
            events.push(GameEvent::GuessWrong {
                guesser: guesser.clone(),
                next,
            });
        }

        events.extend(self.begin_turn());
        self.verified(events)
    }

    /// Starts a turn round for the current player and arms its deadline.
    pub(super) fn begin_turn(&mut self) -> Vec<GameEvent> {
        if self.turn_order.is_empty() {
            return Vec::new();
        }
        self.current_turn %= self.turn_order.len();
        let player = self.turn_order[self.current_turn].clone();

        let players: Vec<PlayerId> = self.roster.iter().map(|p| p.id().clone()).collect();
        let mut aliases: Vec<String> = self
            .roster
            .iter()
            .filter_map(|p| p.alias().clone())
            .collect();
        self.random.shuffle_aliases(&mut aliases);

        debug!(player = %player, index = self.current_turn, "Turn started");
        vec![
            GameEvent::TurnStarted {
                player,
                players,
                aliases,
            },
            self.arm_deadline(DeadlineKind::Turn),
        ]
    }

    /// Handles an expired turn.
    pub(super) fn turn_timed_out(&mut self) -> Vec<GameEvent> {
        let Some(owner) = self.current_player().cloned() else {
            return Vec::new();
        };
        let Some(idx) = self.position(&owner) else {
            return Vec::new();
        };
        let missed_turns = self.roster[idx].record_miss();
        info!(player = %owner, missed_turns, "Turn timed out");

        let mut events = vec![GameEvent::TurnTimedOut {
            player: owner.clone(),
            missed_turns,
        }];

        if missed_turns >= *self.config.missed_turn_limit() {
            info!(player = %owner, "Eliminated for missed turns");
            self.remove_player(&owner);
            events.push(GameEvent::PlayerEliminated {
                player: owner,
                reason: EliminationReason::MissedTurns,
            });
            if let Some(over) = self.check_for_winner() {
                events.extend(over);
                return events;
            }
        } else {
            self.advance_turn();
        }

        events.extend(self.begin_turn());
        events
    }

    fn advance_turn(&mut self) {
        if !self.turn_order.is_empty() {
            self.current_turn = (self.current_turn + 1) % self.turn_order.len();
        }
    }
}
