//! Seedable randomness for turn order and alias prompts.

use crate::PlayerId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::instrument;

/// Source of the two shuffles the game performs.
///
/// Production sessions use [`SeededRandom`]; tests can script the order.
pub trait RandomSource: Send + std::fmt::Debug {
    /// Shuffles the roster into the turn order, once per game.
    fn shuffle_players(&mut self, players: &mut [PlayerId]);

    /// Shuffles the alias column of a turn prompt.
    fn shuffle_aliases(&mut self, aliases: &mut [String]);
}

/// [`RandomSource`] backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a deterministic source from a seed.
    #[instrument]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from OS entropy.
    #[instrument]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a source from an optional seed.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn shuffle_players(&mut self, players: &mut [PlayerId]) {
        players.shuffle(&mut self.rng);
    }

    fn shuffle_aliases(&mut self, aliases: &mut [String]) {
        aliases.shuffle(&mut self.rng);
    }
}
