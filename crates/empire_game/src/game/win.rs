//! Terminal-state detection.

use super::events::GameEvent;
use super::phase::{Outcome, Phase};
use super::session::GameSession;
use tracing::info;

impl GameSession {
    /// Ends the game once fewer than two players remain.
    ///
    /// Returns `None` while the game can continue.
    pub(super) fn check_for_winner(&mut self) -> Option<Vec<GameEvent>> {
        if self.roster.len() >= 2 {
            return None;
        }

        let outcome = match self.roster.first() {
            Some(player) => Outcome::Winner(player.id().clone()),
            None => Outcome::NoPlayersLeft,
        };
        info!(room = %self.room, %outcome, "Game over");

        let mut events: Vec<GameEvent> = self.clear_deadline().into_iter().collect();
        self.phase = Phase::Ended;
        self.outcome = Some(outcome.clone());
        events.push(GameEvent::GameOver { outcome });
        Some(events)
    }
}
