//! Empire Game library - alias-guessing elimination game engine
//!
//! Players join a room's session, secretly register an alias, then take
//! turns guessing which alias belongs to whom. A correct guess eliminates
//! the target and grants another turn; two missed turns in a row eliminate
//! the sleeper. The last player standing wins.
//!
//! # Architecture
//!
//! - **Game**: the per-room [`GameSession`] state machine (roster, alias
//!   phase, turn engine, win detection) returning [`GameEvent`]s
//! - **Registry**: [`SessionRegistry`], one live session per room, serialized
//!   per room, with cancellable deadline timers
//! - **Messaging**: [`Messenger`] and [`Directory`] collaborator contracts
//! - **Commands**: the text command table driving the registry
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use empire_game::{ConsoleMessenger, GameConfig, PlayerId, RoomId, SessionRegistry, StaticDirectory};
//!
//! # async fn example() -> Result<(), empire_game::GameError> {
//! let registry = SessionRegistry::new(
//!     GameConfig::default(),
//!     Arc::new(ConsoleMessenger),
//!     Arc::new(StaticDirectory::new()),
//! );
//! let room = RoomId::new("guild-1");
//! registry.create_session(room.clone(), PlayerId::new("host")).await?;
//! registry.join(&room, PlayerId::new("alice")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod commands;
mod config;
mod error;
mod game;
mod ids;
mod messaging;
mod random;
mod registry;
mod render;
mod timer;

// Crate-level exports - Identifiers and errors
pub use error::GameError;
pub use ids::{PlayerId, RoomId};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Game state machine
pub use game::{
    DeadlineKind, DeadlineStamp, EliminationReason, GameEvent, GameSession, Invariant,
    InvariantSet, InvariantViolation, Outcome, Phase, Player, PlayerView, SessionSnapshot,
    rules_text,
};

// Crate-level exports - Randomness
pub use random::{RandomSource, SeededRandom};

// Crate-level exports - Collaborators
pub use messaging::{ConsoleMessenger, Directory, Messenger, MessagingError, StaticDirectory};
pub use render::announcement;

// Crate-level exports - Registry and timers
pub use registry::{RandomFactory, SessionRegistry};
pub use timer::{DeadlineFired, DeadlineScheduler, TimerHandle};

// Crate-level exports - Command surface
pub use commands::{
    COMMANDS, Command, CommandLine, CommandSpec, ParseCommandError, Reply, command_spec, execute,
    usage,
};
