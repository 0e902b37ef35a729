//! Collaborator contracts: message delivery and display-name lookup.
//!
//! The engine only calls these; it never depends on how a chat platform
//! renders or delivers anything. Console implementations back the CLI.

use crate::{PlayerId, RoomId};
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Delivers game output to a room.
///
/// Errors are logged by the caller and never roll back game state.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Posts a public message to the room.
    async fn notify(&self, room: &RoomId, content: &str) -> Result<(), MessagingError>;

    /// Prompts `player` to guess, showing the players and shuffled aliases.
    async fn prompt_turn(
        &self,
        room: &RoomId,
        player: &PlayerId,
        players: &[String],
        aliases: &[String],
    ) -> Result<(), MessagingError>;

    /// Grants or revokes a player's permission to write in the room.
    async fn restrict_write(
        &self,
        room: &RoomId,
        player: &PlayerId,
        allowed: bool,
    ) -> Result<(), MessagingError>;
}

/// Resolves player identities for rendering only.
pub trait Directory: Send + Sync {
    /// Returns the name to show for `player`.
    fn resolve_display_name(&self, player: &PlayerId) -> String;
}

/// Messaging failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Messaging error: {} at {}:{}", message, file, line)]
pub struct MessagingError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MessagingError {
    /// Creates a new messaging error with caller location tracking.
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

/// [`Messenger`] that prints to standard output.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMessenger;

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn notify(&self, room: &RoomId, content: &str) -> Result<(), MessagingError> {
        println!("[{}] {}", room, content);
        Ok(())
    }

    async fn prompt_turn(
        &self,
        room: &RoomId,
        player: &PlayerId,
        players: &[String],
        aliases: &[String],
    ) -> Result<(), MessagingError> {
        println!("[{}] {}'s turn!", room, player);
        println!("[{}]   Players: {}", room, players.join(", "));
        println!("[{}]   Aliases: {}", room, aliases.join(", "));
        Ok(())
    }

    async fn restrict_write(
        &self,
        room: &RoomId,
        player: &PlayerId,
        allowed: bool,
    ) -> Result<(), MessagingError> {
        debug!(room = %room, player = %player, allowed, "Write permission changed");
        if !allowed {
            println!("[{}] {} can no longer post here", room, player);
        }
        Ok(())
    }
}

/// [`Directory`] backed by a fixed name table, falling back to the raw id.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    names: HashMap<PlayerId, String>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a display name.
    pub fn with_name(mut self, player: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        self.names.insert(player.into(), name.into());
        self
    }
}

impl Directory for StaticDirectory {
    fn resolve_display_name(&self, player: &PlayerId) -> String {
        self.names
            .get(player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }
}
