#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! This crate implements the search engines behind our maze agents. You provide an
//! [EnvironmentAdapter] that knows how to generate successors, score states and tell when the game
//! is over, and the crate decides what the primary actor should do next.
//!
//! There are two engines:
//!
//! - [alphabeta] is a minimax search with alpha-beta pruning, an optional depth cutoff and a
//!   transposition table that is kept for a whole episode
//! - [a_star] plans a full sequence of actions to a winning state, ignoring any adversary
//!
//! Both are driven through the [DecisionMaker] trait, which is the only thing a game loop needs
//! to call once per turn.

use std::{
    cell::Cell,
    time::{Duration, Instant},
};

pub mod a_star;
pub mod alphabeta;
pub mod environment;
pub mod evaluator;
pub mod fingerprint;
pub mod transposition;

mod decision;
pub use decision::{DecisionMaker, SearchReport};

pub use environment::{Action, ActorId, EnvironmentAdapter, Position, PRIMARY_ACTOR};
pub use evaluator::{Evaluator, EvaluatorWeights, LinearEvaluator, TargetDistancePolicy};

#[derive(Debug, Clone, Default)]
/// Counts the nodes an engine expands during a single decision and remembers when the decision
/// started.
///
/// The counter uses a [Cell] so the engines can bump it from deep inside a recursive search
/// without threading a `&mut` through every call.
pub struct Instruments {
    nodes_expanded: Cell<u64>,
    started_at: Option<Instant>,
}

impl Instruments {
    /// Start a fresh measurement
    pub fn start() -> Self {
        Self {
            nodes_expanded: Cell::new(0),
            started_at: Some(Instant::now()),
        }
    }

    /// Record that one more node had its successors generated
    pub fn observe_expansion(&self) {
        self.nodes_expanded.set(self.nodes_expanded.get() + 1);
    }

    /// How many nodes were expanded since [Instruments::start]
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded.get()
    }

    /// Time since [Instruments::start], zero if the instruments were never started
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod test_utils;
