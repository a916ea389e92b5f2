//! Static estimates for states the search won't look past.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::environment::{EnvironmentAdapter, PRIMARY_ACTOR};

/// This trait is used for anything that can guess how good a non-terminal state is for the
/// primary actor.
///
/// It is only consulted when a depth cutoff is hit, terminal states are always scored by the
/// environment itself.
pub trait Evaluator<E: EnvironmentAdapter> {
    /// Estimate the value of `state`. Must be defined for every non-terminal state
    fn estimate(&self, env: &E, state: &E::State) -> i64;
}

impl<E, FnLike> Evaluator<E> for FnLike
where
    E: EnvironmentAdapter,
    FnLike: Fn(&E, &E::State) -> i64,
{
    fn estimate(&self, env: &E, state: &E::State) -> i64 {
        (self)(env, state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
/// Which target [LinearEvaluator] measures the distance to
pub enum TargetDistancePolicy {
    /// The closest remaining target. Rewards making progress on the next target
    #[default]
    Nearest,
    /// The farthest remaining target. This is the admissible choice, every target has to be
    /// reached eventually
    Farthest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Coefficients of the [LinearEvaluator]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use pacman_search::{EvaluatorWeights, TargetDistancePolicy};
///
/// let defaults: EvaluatorWeights = Default::default();
///
/// assert_eq!(defaults.remaining_targets, -100);
/// assert_eq!(defaults.target_distance, -5);
/// assert_eq!(defaults.adversary_distance, -1);
/// assert_eq!(defaults.score, 1);
/// assert_eq!(defaults.distance_policy, TargetDistancePolicy::Nearest);
/// ```
pub struct EvaluatorWeights {
    /// Multiplied by the number of targets left
    pub remaining_targets: i64,
    /// Multiplied by the distance to the target picked by `distance_policy`
    pub target_distance: i64,
    /// Multiplied by the distance to each adversary
    pub adversary_distance: i64,
    /// Multiplied by the current score
    pub score: i64,
    /// Which target `target_distance` applies to
    pub distance_policy: TargetDistancePolicy,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            remaining_targets: -100,
            target_distance: -5,
            adversary_distance: -1,
            score: 1,
            distance_policy: TargetDistancePolicy::Nearest,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// A weighted sum of a handful of facts about the state.
///
/// See [EvaluatorWeights] for the terms.
pub struct LinearEvaluator {
    weights: EvaluatorWeights,
}

impl LinearEvaluator {
    #[allow(missing_docs)]
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    #[allow(missing_docs)]
    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }
}

impl<E: EnvironmentAdapter> Evaluator<E> for LinearEvaluator {
    fn estimate(&self, env: &E, state: &E::State) -> i64 {
        let weights = &self.weights;
        let me = env.actor_position(state, PRIMARY_ACTOR);
        let targets = env.remaining_targets(state);

        let distances = targets.iter().map(|target| me.dist_from(target));
        let target_distance = match weights.distance_policy {
            TargetDistancePolicy::Nearest => distances.min(),
            TargetDistancePolicy::Farthest => distances.max(),
        }
        .unwrap_or(0);

        let adversary_distance: i64 = (0..env.actor_count(state))
            .filter(|&actor| actor != PRIMARY_ACTOR)
            .map(|actor| me.dist_from(&env.actor_position(state, actor)))
            .sum();

        weights.remaining_targets * targets.len() as i64
            + weights.target_distance * target_distance
            + weights.adversary_distance * adversary_distance
            + weights.score * env.score(state)
    }
}

/// Distance from the primary actor to the farthest remaining target, zero when nothing is left.
///
/// Every remaining target still has to be visited, so this never overestimates the number of
/// moves left.
pub fn farthest_target_distance<E: EnvironmentAdapter>(env: &E, state: &E::State) -> i64 {
    let me = env.actor_position(state, PRIMARY_ACTOR);

    env.remaining_targets(state)
        .iter()
        .map(|target| me.dist_from(target))
        .minmax()
        .into_option()
        .map(|(_, max)| max)
        .unwrap_or(0)
}
