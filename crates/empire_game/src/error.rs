//! Failure kinds returned by game operations.

/// Error returned when a game operation is rejected.
///
/// Every variant except [`GameError::InvariantViolation`] is a local
/// validation failure: the session stays in the state it was in before the
/// call. An invariant violation aborts the offending session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The session is not accepting roster changes.
    #[display("The game is not currently being set up")]
    NotJoinable,

    /// The roster already holds the maximum number of players.
    #[display("The game already has the maximum number of players")]
    Full,

    /// The player is already on the roster.
    #[display("You have already joined the game")]
    AlreadyJoined,

    /// The caller is not part of the game.
    #[display("You are not part of the game")]
    NotAPlayer,

    /// Only the host may perform this operation.
    #[display("Only the host can do that")]
    NotHost,

    /// Not enough players joined to start.
    #[display("Not enough players joined the game")]
    TooFewPlayers,

    /// The game has already left setup.
    #[display("The game has already started")]
    AlreadyStarted,

    /// The operation belongs to a phase the game is not in.
    #[display("The game has not reached that phase")]
    NotStarted,

    /// The player already registered an alias.
    #[display("You have already saved your alias")]
    AlreadySubmitted,

    /// Another player registered the same alias.
    #[display("This alias has already been taken")]
    AliasTaken,

    /// The alias is empty after trimming.
    #[display("An alias cannot be empty")]
    InvalidAlias,

    /// The caller does not own the current turn.
    #[display("It's not your turn")]
    OutOfTurn,

    /// The guessed alias is not registered by anyone.
    #[display("This alias is not valid")]
    UnknownAlias,

    /// Players cannot guess their own alias.
    #[display("You cannot guess your own alias")]
    SelfGuess,

    /// The room already hosts a live session.
    #[display("A game is already in progress or setup in this room")]
    SessionExists,

    /// The room has no live session.
    #[display("There is no game in this room")]
    NoSession,

    /// A session invariant no longer holds; the session was aborted.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for GameError {}

impl GameError {
    /// Returns true if this error aborted the session it came from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::InvariantViolation(_))
    }
}
