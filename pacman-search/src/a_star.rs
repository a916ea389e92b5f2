//! Single-agent planning with A*.
//!
//! With no adversary to worry about, the primary actor can plan its whole game up front. The plan
//! is computed once and then played back one action per turn.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::FxHashSet;
use tracing::{debug, field, info_span, warn};

use crate::{
    decision::{DecisionMaker, SearchReport},
    environment::{Action, EnvironmentAdapter, PRIMARY_ACTOR},
    evaluator::farthest_target_distance,
    fingerprint::PathFingerprint,
    Instruments,
};

struct Node<S> {
    cost: i64,
    score: i64,
    sequence: u64,
    state: S,
    moves: Vec<Action>,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap.
impl<S> Ord for Node<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Notice that the we flip the ordering on costs.
        // On equal costs the higher score goes first, then whatever was pushed first
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.score.cmp(&other.score))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

// `PartialOrd` needs to be implemented as well.
impl<S> PartialOrd for Node<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for Node<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Node<S> {}

/// Finds the cheapest sequence of primary actor actions that wins the game.
///
/// Cost is the number of moves. The heuristic is the distance to the farthest remaining target,
/// which never overestimates, so the first winning state popped is reached by a shortest plan.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'env, E> {
    env: &'env E,
}

impl<'env, E: EnvironmentAdapter> PathFinder<'env, E> {
    #[allow(missing_docs)]
    pub fn new(env: &'env E) -> Self {
        Self { env }
    }

    /// Plan from `start` to a winning state.
    ///
    /// Returns an empty plan if no winning state is reachable.
    pub fn find_plan(
        &self,
        start: &E::State,
        instruments: &Instruments,
    ) -> Result<Vec<Action>, E::Error> {
        let env = self.env;
        let mut to_search: BinaryHeap<Node<E::State>> = BinaryHeap::new();
        let mut closed: FxHashSet<PathFingerprint> = FxHashSet::default();
        let mut sequence = 0;

        to_search.push(Node {
            cost: farthest_target_distance(env, start),
            score: env.score(start),
            sequence,
            state: start.clone(),
            moves: vec![],
        });

        while let Some(Node { state, moves, .. }) = to_search.pop() {
            let fingerprint = PathFingerprint::new(env, &state);
            if closed.contains(&fingerprint) {
                continue;
            }

            if env.is_win(&state) {
                debug!(moves = moves.len(), "Found a winning plan");
                return Ok(moves);
            }

            closed.insert(fingerprint);

            if env.is_terminal(&state) {
                continue;
            }

            instruments.observe_expansion();

            for (next, action) in env.successors(&state, PRIMARY_ACTOR)? {
                if action.is_idle() || closed.contains(&PathFingerprint::new(env, &next)) {
                    continue;
                }

                let mut next_moves = moves.clone();
                next_moves.push(action);
                sequence += 1;

                to_search.push(Node {
                    cost: next_moves.len() as i64 + farthest_target_distance(env, &next),
                    score: env.score(&next),
                    sequence,
                    state: next,
                    moves: next_moves,
                });
            }
        }

        Ok(vec![])
    }
}

#[derive(Debug, Clone)]
/// Plays back an A* plan, one action per turn.
///
/// The plan is computed from the first state this agent is asked about and kept for the rest of
/// the episode. Once it runs out the agent stays put.
pub struct PlanningAgent<E> {
    env: E,
    /// Shows up in traces and reports
    pub name: &'static str,
    plan: Option<VecDeque<Action>>,
}

impl<E: EnvironmentAdapter> PlanningAgent<E> {
    #[allow(missing_docs)]
    pub fn new(env: E, name: &'static str) -> Self {
        Self {
            env,
            name,
            plan: None,
        }
    }

    /// What is left of the plan, `None` if it hasn't been computed yet
    pub fn remaining_plan(&self) -> Option<&VecDeque<Action>> {
        self.plan.as_ref()
    }

    /// Forget the plan so the next turn plans again
    pub fn end_episode(&mut self) {
        self.plan = None;
    }
}

impl<E: EnvironmentAdapter> DecisionMaker<E> for PlanningAgent<E> {
    fn name(&self) -> &str {
        self.name
    }

    fn choose_action_with_report(&mut self, state: &E::State) -> Result<SearchReport, E::Error> {
        info_span!(
            "choose_action",
            agent_name = self.name,
            chosen_action = field::Empty,
            plan_length = field::Empty,
            nodes_expanded = field::Empty,
            elapsed_ms = field::Empty,
        )
        .in_scope(|| {
            let instruments = Instruments::start();

            if self.plan.is_none() {
                let plan = PathFinder::new(&self.env).find_plan(state, &instruments)?;
                if plan.is_empty() {
                    warn!("No winning plan found, staying put");
                }

                tracing::Span::current().record("plan_length", plan.len() as u64);
                self.plan = Some(plan.into());
            }

            let action = self
                .plan
                .as_mut()
                .and_then(|plan| plan.pop_front())
                .unwrap_or(Action::Stop);

            let current_span = tracing::Span::current();
            current_span.record("chosen_action", field::display(action));
            current_span.record("nodes_expanded", instruments.nodes_expanded());
            current_span.record("elapsed_ms", instruments.elapsed().as_millis() as u64);

            Ok(SearchReport {
                action,
                score: None,
                nodes_expanded: instruments.nodes_expanded(),
                elapsed: instruments.elapsed(),
                options: vec![],
            })
        })
    }
}
