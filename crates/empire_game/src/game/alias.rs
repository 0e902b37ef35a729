//! Alias registration phase.

use super::events::GameEvent;
use super::phase::Phase;
use super::session::GameSession;
use crate::{GameError, PlayerId};
use tracing::{debug, info, instrument, warn};

impl GameSession {
    /// Registers a player's secret alias.
    ///
    /// The alias is trimmed and compared case-sensitively. When the last
    /// player registers, the phase closes immediately and the first turn
    /// begins.
    #[instrument(skip(self, alias), fields(room = %self.room))]
    pub fn submit_alias(
        &mut self,
        player: &PlayerId,
        alias: &str,
    ) -> Result<Vec<GameEvent>, GameError> {
        if !self.phase.is_alias_collection() {
            return Err(GameError::NotStarted);
        }
        let idx = self.position(player).ok_or(GameError::NotAPlayer)?;
        if self.roster[idx].has_alias() {
            return Err(GameError::AlreadySubmitted);
        }
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(GameError::InvalidAlias);
        }
        if self
            .roster
            .iter()
            .any(|p| p.alias().as_deref() == Some(alias))
        {
            warn!(player = %player, "Alias already taken");
            return Err(GameError::AliasTaken);
        }

        self.roster[idx].set_alias(alias.to_string());
        let registered = self.roster.iter().filter(|p| p.has_alias()).count();
        info!(player = %player, registered, total = self.roster.len(), "Alias saved");

        let mut events = vec![GameEvent::AliasSaved {
            player: player.clone(),
        }];
        if registered == self.roster.len() {
            debug!("Every player registered, closing alias phase early");
            events.extend(self.close_alias_phase());
        }
        self.verified(events)
    }

    /// Ends alias registration, dropping everyone who did not register.
    pub(super) fn close_alias_phase(&mut self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self.clear_deadline().into_iter().collect();

        let stragglers: Vec<PlayerId> = self
            .roster
            .iter()
            .filter(|p| !p.has_alias())
            .map(|p| p.id().clone())
            .collect();
        for player in &stragglers {
            self.remove_player(player);
        }
        if !stragglers.is_empty() {
            info!(players = ?stragglers, "Eliminated players without an alias");
            events.push(GameEvent::PlayersDisqualified {
                players: stragglers,
            });
        }

        if let Some(over) = self.check_for_winner() {
            events.extend(over);
            return events;
        }

        self.phase = Phase::Guessing;
        self.current_turn = 0;
        events.extend(self.begin_turn());
        events
    }
}
