//! Plain-text announcements for game events.

use crate::{Directory, EliminationReason, GameEvent, Outcome, PlayerId};

fn names(directory: &dyn Directory, players: &[PlayerId]) -> String {
    players
        .iter()
        .map(|p| directory.resolve_display_name(p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Returns the public announcement for an event, if it has one.
///
/// Turn prompts, deadline bookkeeping and alias acknowledgements are not
/// announced publicly.
pub fn announcement(event: &GameEvent, directory: &dyn Directory) -> Option<String> {
    let name = |p: &PlayerId| directory.resolve_display_name(p);
    let text = match event {
        GameEvent::SetupOpened { host, max_players } => format!(
            "{} is setting up an Empire Game. Join now! (max {} players)",
            name(host),
            max_players
        ),
        GameEvent::PlayerJoined {
            player,
            roster_size,
        } => format!("{} joined the game ({} joined)", name(player), roster_size),
        GameEvent::PlayerLeft {
            player,
            roster_size,
        } => format!("{} left the game ({} joined)", name(player), roster_size),
        GameEvent::AliasPhaseOpened { players, deadline } => format!(
            "Game started! {} have {} seconds to save their aliases.",
            names(directory, players),
            deadline.as_secs()
        ),
        GameEvent::PlayersDisqualified { players } => format!(
            "Eliminated for not saving an alias in time: {}",
            names(directory, players)
        ),
        GameEvent::GuessCorrect { target, .. } => {
            format!("Correct guess! {} was eliminated.", name(target))
        }
        GameEvent::GuessWrong { next, .. } => {
            format!("Wrong guess. It's now {}'s turn.", name(next))
        }
        GameEvent::TurnTimedOut { player, .. } => format!(
            "{} took too long to guess. Moving to the next player.",
            name(player)
        ),
        GameEvent::PlayerEliminated {
            player,
            reason: EliminationReason::MissedTurns,
        } => format!("{} missed too many turns and was eliminated.", name(player)),
        GameEvent::GameOver {
            outcome: Outcome::Winner(winner),
        } => format!("We have a winner! Congratulations {}!", name(winner)),
        GameEvent::GameOver {
            outcome: Outcome::NoPlayersLeft,
        } => "There are no players left in the game.".to_string(),
        GameEvent::Cancelled => "The game has been cancelled.".to_string(),
        GameEvent::PlayerEliminated { .. }
        | GameEvent::AliasSaved { .. }
        | GameEvent::TurnStarted { .. }
        | GameEvent::DeadlineArmed { .. }
        | GameEvent::DeadlineCleared => return None,
    };
    Some(text)
}
