//! Canonical identities for states, used as keys by the transposition table, the ancestor set and
//! the A* closed set.

use itertools::Itertools;

use crate::environment::{Action, ActorId, EnvironmentAdapter, PRIMARY_ACTOR};
use crate::Position;

/// The previous action of every actor on the current search path, indexed by [ActorId].
///
/// `None` means the actor hasn't moved on this path yet.
pub type PreviousActions = Vec<Option<Action>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identity of a node in the adversarial search.
///
/// Two nodes with the same fingerprint have the same successors and the same value, so they can
/// share a transposition table entry. Besides what the state looks like this includes whose turn
/// it is, what the adversaries did last, and whether the primary actor is allowed to idle.
pub struct Fingerprint {
    actor_positions: Vec<Position>,
    targets: Vec<Position>,
    actor_to_move: ActorId,
    adversary_actions: Vec<Option<Action>>,
    idle_available: bool,
}

impl Fingerprint {
    /// Build the fingerprint of `state` with `actor_to_move` about to act.
    ///
    /// `previous_actions` only contributes the adversaries' entries, the primary actor's previous
    /// action matters only through `idle_available`.
    pub fn new<E: EnvironmentAdapter>(
        env: &E,
        state: &E::State,
        actor_to_move: ActorId,
        previous_actions: &[Option<Action>],
        idle_available: bool,
    ) -> Self {
        let actor_positions = (0..env.actor_count(state))
            .map(|actor| env.actor_position(state, actor))
            .collect();
        let adversary_actions = previous_actions
            .iter()
            .enumerate()
            .filter(|(actor, _)| *actor != PRIMARY_ACTOR)
            .map(|(_, action)| *action)
            .collect();

        Self {
            actor_positions,
            targets: env.remaining_targets(state).into_iter().sorted().collect(),
            actor_to_move,
            adversary_actions,
            idle_available,
        }
    }

    #[allow(missing_docs)]
    pub fn actor_to_move(&self) -> ActorId {
        self.actor_to_move
    }

    #[allow(missing_docs)]
    pub fn idle_available(&self) -> bool {
        self.idle_available
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identity of a state in the single-agent path search.
///
/// With nobody else moving, a state is fully described by where the primary actor is and what it
/// still has to collect.
pub struct PathFingerprint {
    position: Position,
    targets: Vec<Position>,
}

impl PathFingerprint {
    #[allow(missing_docs)]
    pub fn new<E: EnvironmentAdapter>(env: &E, state: &E::State) -> Self {
        Self {
            position: env.actor_position(state, PRIMARY_ACTOR),
            targets: env.remaining_targets(state).into_iter().sorted().collect(),
        }
    }
}
