//! Game rule configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunable rules for every session created by a registry.
///
/// Loaded from TOML; every key is optional and falls back to the classic
/// rules (15 players, 60 second deadlines, eliminated after two misses).
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Maximum roster size during setup.
    #[serde(default = "default_max_players")]
    max_players: usize,

    /// Minimum roster size required to start.
    #[serde(default = "default_min_players")]
    min_players: usize,

    /// Seconds players have to register an alias.
    #[serde(default = "default_deadline_secs")]
    alias_deadline_secs: u64,

    /// Seconds a player has to guess before the turn times out.
    #[serde(default = "default_deadline_secs")]
    turn_deadline_secs: u64,

    /// Consecutive timed-out turns that eliminate a player.
    #[serde(default = "default_missed_turn_limit")]
    missed_turn_limit: u32,

    /// Seed for turn order and alias shuffles. Absent means OS entropy.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_max_players() -> usize {
    15
}

#[instrument]
fn default_min_players() -> usize {
    2
}

#[instrument]
fn default_deadline_secs() -> u64 {
    60
}

#[instrument]
fn default_missed_turn_limit() -> u32 {
    2
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: default_max_players(),
            min_players: default_min_players(),
            alias_deadline_secs: default_deadline_secs(),
            turn_deadline_secs: default_deadline_secs(),
            missed_turn_limit: default_missed_turn_limit(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            max_players = config.max_players,
            turn_deadline_secs = config.turn_deadline_secs,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text and validates it.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with the given shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with both deadlines replaced.
    ///
    /// Deadlines are kept in whole seconds, so fractional durations are
    /// rejected rather than rounded, and the result is validated.
    #[instrument(skip(self))]
    pub fn with_deadlines(mut self, alias: Duration, turn: Duration) -> Result<Self, ConfigError> {
        if alias.subsec_nanos() != 0 || turn.subsec_nanos() != 0 {
            return Err(ConfigError::new(format!(
                "Deadlines must be whole seconds, got {:?} and {:?}",
                alias, turn
            )));
        }
        self.alias_deadline_secs = alias.as_secs();
        self.turn_deadline_secs = turn.as_secs();
        self.validate()?;
        Ok(self)
    }

    /// Alias registration window.
    pub fn alias_deadline(&self) -> Duration {
        Duration::from_secs(self.alias_deadline_secs)
    }

    /// Per-turn guessing window.
    pub fn turn_deadline(&self) -> Duration {
        Duration::from_secs(self.turn_deadline_secs)
    }

    /// Checks that the rules describe a playable game.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::new(format!(
                "min_players must be at least 2, got {}",
                self.min_players
            )));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::new(format!(
                "max_players ({}) is below min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.alias_deadline_secs == 0 || self.turn_deadline_secs == 0 {
            return Err(ConfigError::new("Deadlines must be at least one second"));
        }
        if self.missed_turn_limit == 0 {
            return Err(ConfigError::new("missed_turn_limit must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
