//! First-class invariants for game sessions.
//!
//! Invariants are logical properties that must hold after every operation.
//! The session checks them as a set before returning events; a failure
//! aborts that session only.

use super::phase::{DeadlineKind, Phase};
use super::session::GameSession;
use std::collections::HashSet;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two to five invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);

/// Invariant: once started, the turn order holds exactly the roster.
pub struct TurnOrderMatchesRoster;

impl Invariant<GameSession> for TurnOrderMatchesRoster {
    fn holds(session: &GameSession) -> bool {
        match session.phase {
            Phase::Idle | Phase::Setup => session.turn_order.is_empty(),
            Phase::AliasCollection | Phase::Guessing => {
                let order: HashSet<_> = session.turn_order.iter().collect();
                let roster: HashSet<_> = session.roster.iter().map(|p| p.id()).collect();
                order.len() == session.turn_order.len() && order == roster
            }
            Phase::Ended => true,
        }
    }

    fn description() -> &'static str {
        "Turn order contains exactly the active players"
    }
}

/// Invariant: the current-turn index is valid for a non-empty order.
pub struct CurrentTurnInRange;

impl Invariant<GameSession> for CurrentTurnInRange {
    fn holds(session: &GameSession) -> bool {
        session.turn_order.is_empty() || session.current_turn < session.turn_order.len()
    }

    fn description() -> &'static str {
        "Current turn points into the turn order"
    }
}

/// Invariant: no two players registered the same alias.
pub struct AliasesUnique;

impl Invariant<GameSession> for AliasesUnique {
    fn holds(session: &GameSession) -> bool {
        let mut seen = HashSet::new();
        session
            .roster
            .iter()
            .filter_map(|p| p.alias().as_deref())
            .all(|alias| seen.insert(alias))
    }

    fn description() -> &'static str {
        "Registered aliases are unique"
    }
}

/// Invariant: the roster never exceeds the configured capacity and never
/// repeats an id.
pub struct RosterWithinCapacity;

impl Invariant<GameSession> for RosterWithinCapacity {
    fn holds(session: &GameSession) -> bool {
        let ids: HashSet<_> = session.roster.iter().map(|p| p.id()).collect();
        ids.len() == session.roster.len() && session.roster.len() <= *session.config.max_players()
    }

    fn description() -> &'static str {
        "Roster is within capacity and free of duplicates"
    }
}

/// Invariant: the pending deadline belongs to the current phase.
pub struct DeadlineMatchesPhase;

impl Invariant<GameSession> for DeadlineMatchesPhase {
    fn holds(session: &GameSession) -> bool {
        let kind = session.pending.map(|stamp| stamp.kind);
        let generation_ok = session
            .pending
            .is_none_or(|stamp| stamp.generation == session.generation);
        generation_ok
            && match session.phase {
                Phase::Idle | Phase::Setup | Phase::Ended => kind.is_none(),
                Phase::AliasCollection => kind == Some(DeadlineKind::AliasPhase),
                Phase::Guessing => kind == Some(DeadlineKind::Turn),
            }
    }

    fn description() -> &'static str {
        "Pending deadline belongs to the current phase and generation"
    }
}
