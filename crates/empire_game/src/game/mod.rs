mod alias;
mod events;
mod invariants;
mod phase;
mod player;
mod roster;
mod rules;
mod session;
mod turn;
mod win;

pub use events::{EliminationReason, GameEvent};
pub use invariants::{Invariant, InvariantSet, InvariantViolation};
pub use phase::{DeadlineKind, DeadlineStamp, Outcome, Phase};
pub use player::Player;
pub use rules::rules_text;
pub use session::{GameSession, PlayerView, SessionSnapshot};
