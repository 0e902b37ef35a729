//! Human-readable rules summary.

use crate::GameConfig;

/// Returns the rules as shown to players, using the configured limits.
pub fn rules_text(config: &GameConfig) -> String {
    format!(
        "Empire Game rules:\n\
         1. Join: up to {max} players can join while the host sets up the game.\n\
         2. Start: the host starts once at least {min} players have joined.\n\
         3. Save aliases: every player saves one secret alias within {alias_secs} seconds. \
         Players without an alias are eliminated.\n\
         4. Guess: on your turn, name a player and the alias you think is theirs. \
         You have {turn_secs} seconds.\n\
         5. Extra turns: a correct guess eliminates that player and you go again.\n\
         6. One alias: each player can save their alias only once.\n\
         7. Elimination: miss {limit} turns in a row and you are out.\n\
         The last player standing wins.",
        max = config.max_players(),
        min = config.min_players(),
        alias_secs = config.alias_deadline_secs(),
        turn_secs = config.turn_deadline_secs(),
        limit = config.missed_turn_limit(),
    )
}
