//! Text command surface.
//!
//! A command line has the shape `<room> <actor> <command> [args...]`. The
//! command name is looked up in [`COMMANDS`], an explicit name-to-builder
//! table, and the resulting [`Command`] runs against a [`SessionRegistry`].

use crate::{GameError, PlayerId, RoomId, SessionRegistry, SessionSnapshot, rules_text};
use derive_more::{Display, Error};
use std::str::FromStr;
use tracing::{debug, instrument};

/// A parsed game command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a session in the room with the actor as host.
    CreateSession,
    /// Join the roster.
    Join,
    /// Leave the roster.
    Leave,
    /// Start the game (host only).
    Start,
    /// Cancel the game (host only).
    Cancel,
    /// Register a secret alias.
    SubmitAlias {
        /// The alias to register.
        alias: String,
    },
    /// Guess another player's alias.
    Guess {
        /// The accused player.
        target: PlayerId,
        /// The alias they supposedly registered.
        alias: String,
    },
    /// Show the rules.
    Rules,
    /// Show the session state.
    Status,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    /// Name typed by the user.
    pub name: &'static str,
    /// Argument placeholders, for usage text.
    pub args: &'static str,
    /// Minimum number of arguments.
    pub min_args: usize,
    /// One-line description.
    pub summary: &'static str,
    build: fn(&[&str]) -> Command,
}

/// Every command the surface understands.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "create_session",
        args: "",
        min_args: 0,
        summary: "Set up a new game in this room; you become the host",
        build: |_| Command::CreateSession,
    },
    CommandSpec {
        name: "join",
        args: "",
        min_args: 0,
        summary: "Join the game being set up",
        build: |_| Command::Join,
    },
    CommandSpec {
        name: "leave",
        args: "",
        min_args: 0,
        summary: "Leave the game being set up",
        build: |_| Command::Leave,
    },
    CommandSpec {
        name: "start",
        args: "",
        min_args: 0,
        summary: "Start the game (host only)",
        build: |_| Command::Start,
    },
    CommandSpec {
        name: "cancel",
        args: "",
        min_args: 0,
        summary: "Cancel the game (host only)",
        build: |_| Command::Cancel,
    },
    CommandSpec {
        name: "submit_alias",
        args: "<alias>",
        min_args: 1,
        summary: "Save your secret alias",
        build: |args| Command::SubmitAlias {
            alias: args.join(" "),
        },
    },
    CommandSpec {
        name: "guess",
        args: "<player> <alias>",
        min_args: 2,
        summary: "Guess that a player saved an alias",
        build: |args| Command::Guess {
            target: PlayerId::new(args[0]),
            alias: args[1..].join(" "),
        },
    },
    CommandSpec {
        name: "rules",
        args: "",
        min_args: 0,
        summary: "Explain the rules",
        build: |_| Command::Rules,
    },
    CommandSpec {
        name: "status",
        args: "",
        min_args: 0,
        summary: "Show the current game state",
        build: |_| Command::Status,
    },
];

/// Looks up a command by name.
pub fn command_spec(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Usage text for every command.
pub fn usage() -> String {
    COMMANDS
        .iter()
        .map(|spec| {
            let call = if spec.args.is_empty() {
                spec.name.to_string()
            } else {
                format!("{} {}", spec.name, spec.args)
            };
            format!("  <room> <you> {:<32} {}", call, spec.summary)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseCommandError {
    /// Room, actor or command name is missing.
    #[display("Expected `<room> <actor> <command> [args...]`")]
    Incomplete,
    /// The command name is not in the table.
    #[display("Unknown command `{}`", name)]
    Unknown {
        /// The unrecognised name.
        name: String,
    },
    /// Too few arguments for the command.
    #[display("Usage: {} {}", name, args)]
    MissingArguments {
        /// Command name.
        name: &'static str,
        /// Expected arguments.
        args: &'static str,
    },
}

/// A command together with where it was issued and by whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Room the command targets.
    pub room: RoomId,
    /// Player issuing the command.
    pub actor: PlayerId,
    /// The command.
    pub command: Command,
}

impl FromStr for CommandLine {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let [room, actor, name, args @ ..] = words.as_slice() else {
            return Err(ParseCommandError::Incomplete);
        };
        let spec = command_spec(name).ok_or_else(|| ParseCommandError::Unknown {
            name: name.to_string(),
        })?;
        if args.len() < spec.min_args {
            return Err(ParseCommandError::MissingArguments {
                name: spec.name,
                args: spec.args,
            });
        }
        Ok(Self {
            room: RoomId::new(*room),
            actor: PlayerId::new(*actor),
            command: (spec.build)(args),
        })
    }
}

/// What a successful command returns to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A private acknowledgement for the actor.
    Ack(String),
    /// The session state.
    Status(SessionSnapshot),
    /// Informational text.
    Text(String),
}

/// Runs a parsed command against the registry.
#[instrument(skip(registry))]
pub async fn execute(registry: &SessionRegistry, line: CommandLine) -> Result<Reply, GameError> {
    let CommandLine {
        room,
        actor,
        command,
    } = line;
    debug!(room = %room, actor = %actor, ?command, "Executing command");

    let ack = |text: &str| Ok(Reply::Ack(text.to_string()));
    match command {
        Command::CreateSession => {
            registry.create_session(room, actor).await?;
            ack("Game set up. Players can join now.")
        }
        Command::Join => {
            registry.join(&room, actor).await?;
            ack("You joined the game.")
        }
        Command::Leave => {
            registry.leave(&room, &actor).await?;
            ack("You left the game.")
        }
        Command::Start => {
            registry.start(&room, &actor).await?;
            ack("The game has started.")
        }
        Command::Cancel => {
            registry.cancel(&room, &actor).await?;
            ack("The game has been cancelled.")
        }
        Command::SubmitAlias { alias } => {
            registry.submit_alias(&room, &actor, &alias).await?;
            ack("Your alias has been saved.")
        }
        Command::Guess { target, alias } => {
            registry.guess(&room, &actor, &target, &alias).await?;
            ack("Guess recorded.")
        }
        Command::Rules => Ok(Reply::Text(rules_text(registry.config()))),
        Command::Status => Ok(Reply::Status(registry.snapshot(&room).await?)),
    }
}
