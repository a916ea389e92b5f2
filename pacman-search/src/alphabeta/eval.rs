use std::fmt::Debug;

use derivative::Derivative;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, field, info_span, warn};

use crate::{
    decision::{DecisionMaker, SearchReport},
    environment::{idle_available, Action, ActorId, EnvironmentAdapter, PRIMARY_ACTOR},
    evaluator::Evaluator,
    fingerprint::{Fingerprint, PreviousActions},
    transposition::{TranspositionEntry, TranspositionTable},
    Instruments,
};

use super::{PruningWindow, SearchValue};

/// Fingerprints of the nodes open on the current search path, with the depth each was opened at
type Ancestors = FxHashMap<Fingerprint, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What searching a subtree hands back to its parent
struct Searched {
    value: SearchValue,
    /// Depth of the shallowest node above the subtree that something in it cycled back into
    cycle_floor: Option<usize>,
}

impl Searched {
    fn exact(value: i64) -> Self {
        Self {
            value: SearchValue::Value(value),
            cycle_floor: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Optional properties that can be defined for a [MinimaxAgent]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use pacman_search::alphabeta::SearchOptions;
///
/// let defaults: SearchOptions = Default::default();
///
/// assert_eq!(defaults.max_depth, None);
/// assert!(defaults.pruning);
/// assert!(defaults.memoize);
/// ```
pub struct SearchOptions {
    /// Depth past which states are estimated instead of searched. Root successors are at depth
    /// zero.
    ///
    /// With `None` the search only stops at terminal states, so it recurses as deep as the rest of
    /// the game. That is fine for small mazes but is a real stack risk on big ones
    pub max_depth: Option<usize>,
    /// Whether to use Alpha-Beta pruning
    pub pruning: bool,
    /// Whether to keep a transposition table across nodes and turns
    pub memoize: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::alphabeta()
    }
}

impl SearchOptions {
    /// Exact minimax, every child of every node is searched and nothing is cached
    pub const fn exhaustive() -> Self {
        Self {
            max_depth: None,
            pruning: false,
            memoize: false,
        }
    }

    /// Exact minimax with pruning and a transposition table
    pub const fn alphabeta() -> Self {
        Self {
            max_depth: None,
            pruning: true,
            memoize: true,
        }
    }

    /// Pruned, memoized minimax that estimates everything deeper than `max_depth`
    pub const fn bounded(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            pruning: true,
            memoize: true,
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug(bound = "E: Debug"))]
/// This is the struct that wraps an environment and an evaluator and can be used to run
/// minimax
///
/// One agent lives for one episode. Its transposition table, the last action it chose and the
/// state it chose it in carry over from one turn to the next.
///
/// It also outputs traces using the [tracing] crate.
pub struct MinimaxAgent<E, Ev>
where
    E: EnvironmentAdapter,
    Ev: Evaluator<E>,
{
    env: E,
    #[derivative(Debug = "ignore")]
    evaluator: Ev,
    /// Shows up in traces and reports
    pub name: &'static str,
    options: SearchOptions,
    table: TranspositionTable<E::State>,
    last_action: Option<Action>,
    last_root: Option<E::State>,
}

/// The successors of the primary actor, with the idle action appended when it is allowed.
///
/// See [idle_available] for when that is. Any idle successor the environment generated itself
/// is dropped, idling is decided here and nowhere else.
pub fn primary_successors<E: EnvironmentAdapter>(
    env: &E,
    state: &E::State,
    previous_action: Option<Action>,
) -> Result<Vec<(E::State, Action)>, E::Error> {
    let idle = idle_available(previous_action, &env.legal_actions(state, PRIMARY_ACTOR)?);

    successors_with_idle(env, state, idle)
}

fn successors_with_idle<E: EnvironmentAdapter>(
    env: &E,
    state: &E::State,
    idle: bool,
) -> Result<Vec<(E::State, Action)>, E::Error> {
    let mut successors: Vec<_> = env
        .successors(state, PRIMARY_ACTOR)?
        .into_iter()
        .filter(|(_, action)| !action.is_idle())
        .collect();

    if idle {
        successors.push((state.clone(), Action::Stop));
    }

    Ok(successors)
}

fn with_action(previous: &[Option<Action>], actor: ActorId, action: Action) -> PreviousActions {
    let mut next = previous.to_vec();
    if next.len() <= actor {
        next.resize(actor + 1, None);
    }
    next[actor] = Some(action);

    next
}

impl<E, Ev> MinimaxAgent<E, Ev>
where
    E: EnvironmentAdapter,
    Ev: Evaluator<E>,
{
    /// Construct a new `MinimaxAgent` at the start of an episode
    pub fn new(env: E, evaluator: Ev, name: &'static str, options: SearchOptions) -> Self {
        Self {
            env,
            evaluator,
            name,
            options,
            table: TranspositionTable::new(),
            last_action: None,
            last_root: None,
        }
    }

    #[allow(missing_docs)]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The transposition table built up so far this episode
    pub fn table(&self) -> &TranspositionTable<E::State> {
        &self.table
    }

    /// The action chosen on the previous turn, which decides whether idling is allowed now
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// Forget everything learned during the episode
    pub fn end_episode(&mut self) {
        self.table.clear();
        self.last_action = None;
        self.last_root = None;
    }

    /// What every actor did last, as far as we can tell from `state`.
    ///
    /// The primary actor's entry is whatever we chose last turn. Adversary moves are worked out
    /// from how far each adversary got since the state we last decided on, and stay `None` when
    /// no single movement explains it.
    fn observed_previous_actions(&self, state: &E::State) -> PreviousActions {
        let actor_count = self.env.actor_count(state);
        let mut previous = vec![None; actor_count];

        if let Some(last_root) = &self.last_root {
            if self.env.actor_count(last_root) == actor_count {
                for actor in (0..actor_count).filter(|actor| *actor != PRIMARY_ACTOR) {
                    let from = self.env.actor_position(last_root, actor);
                    let to = self.env.actor_position(state, actor);

                    previous[actor] = Action::movements()
                        .into_iter()
                        .find(|action| from.step(*action) == to);
                }
            }
        }

        previous
    }

    /// Search every root successor and return them in search order with their values.
    ///
    /// The root shares one pruning window across its children. This does not change the last
    /// action, see [DecisionMaker::choose_action] for that.
    pub fn search_root(
        &mut self,
        state: &E::State,
        instruments: &Instruments,
    ) -> Result<Vec<(Action, SearchValue)>, E::Error> {
        let successors = primary_successors(&self.env, state, self.last_action)?;
        let actor_count = self.env.actor_count(state);
        let next_actor = (PRIMARY_ACTOR + 1) % actor_count.max(1);
        let history = self.observed_previous_actions(state);

        instruments.observe_expansion();

        let mut window = PruningWindow::full();
        let mut options = Vec::with_capacity(successors.len());
        for (next, action) in successors {
            let value = self
                .alphabeta(
                    &next,
                    next_actor,
                    0,
                    window,
                    &with_action(&history, PRIMARY_ACTOR, action),
                    &Ancestors::default(),
                    instruments,
                )?
                .value;

            if let SearchValue::Value(v) = value {
                window.tighten(v, true);
            }

            options.push((action, value));
        }

        Ok(options)
    }

    /// The value of `state` with `actor` about to move, searched with a fresh path.
    ///
    /// This goes through the transposition table like any other node would.
    pub fn search_value(
        &mut self,
        state: &E::State,
        actor: ActorId,
        previous_actions: &[Option<Action>],
    ) -> Result<SearchValue, E::Error> {
        Ok(self
            .alphabeta(
                state,
                actor,
                0,
                PruningWindow::full(),
                previous_actions,
                &Ancestors::default(),
                &Instruments::default(),
            )?
            .value)
    }

    fn horizon(&self, depth: usize) -> Option<usize> {
        self.options.max_depth.map(|max_depth| max_depth + 1 - depth)
    }

    #[allow(clippy::too_many_arguments)]
    fn alphabeta(
        &mut self,
        state: &E::State,
        actor: ActorId,
        depth: usize,
        parent_window: PruningWindow,
        previous_actions: &[Option<Action>],
        ancestors: &Ancestors,
        instruments: &Instruments,
    ) -> Result<Searched, E::Error> {
        if self.env.is_terminal(state) {
            return Ok(Searched::exact(self.env.score(state)));
        }

        if matches!(self.options.max_depth, Some(max_depth) if depth > max_depth) {
            return Ok(Searched::exact(self.evaluator.estimate(&self.env, state)));
        }

        let previous_primary = previous_actions.get(PRIMARY_ACTOR).copied().flatten();
        let idle = idle_available(
            previous_primary,
            &self.env.legal_actions(state, PRIMARY_ACTOR)?,
        );
        let fingerprint = Fingerprint::new(&self.env, state, actor, previous_actions, idle);

        if let Some(&ancestor_depth) = ancestors.get(&fingerprint) {
            debug!(actor, depth, ancestor_depth, "Cycle on the current path");
            return Ok(Searched {
                value: SearchValue::Unresolved,
                cycle_floor: Some(ancestor_depth),
            });
        }

        let current_score = self.env.score(state);
        let horizon = self.horizon(depth);

        let mut resumed = None;
        if self.options.memoize {
            if let Some(entry) = self.table.lookup(&fingerprint) {
                if entry.covers_horizon(horizon) {
                    if let Some(score) = entry.rebased_score(current_score) {
                        return Ok(Searched::exact(score));
                    }
                }
            }

            // Stored successors carry the score of the path that generated them
            match self.table.mark_in_progress(fingerprint.clone()) {
                Some(TranspositionEntry::PrunedWithChildren {
                    baseline,
                    successors,
                }) if baseline == current_score => resumed = Some(successors),
                Some(TranspositionEntry::PrunedWithChildren { baseline, .. }) => {
                    debug!(baseline, current_score, "Regenerating successors of a pruned node");
                }
                _ => {}
            }
        }

        let successors = match resumed {
            Some(successors) => successors,
            None if actor == PRIMARY_ACTOR => successors_with_idle(&self.env, state, idle)?,
            None => self.env.successors(state, actor)?,
        };

        instruments.observe_expansion();

        let mut child_ancestors = ancestors.clone();
        child_ancestors.insert(fingerprint.clone(), depth);

        let maximizing = actor == PRIMARY_ACTOR;
        let next_actor = (actor + 1) % self.env.actor_count(state).max(1);

        let mut window = PruningWindow::full();
        let mut candidates = Vec::with_capacity(successors.len());
        let mut pruned = false;
        let mut cycle_floor = None;

        for (next, action) in successors.iter() {
            let child = self.alphabeta(
                next,
                next_actor,
                depth + 1,
                window,
                &with_action(previous_actions, actor, *action),
                &child_ancestors,
                instruments,
            )?;
            cycle_floor = cycle_floor.into_iter().chain(child.cycle_floor).min();

            let candidate = match child.value {
                SearchValue::Value(v) => v,
                SearchValue::Unresolved => continue,
            };
            candidates.push(candidate);

            if self.options.pruning && parent_window.should_prune(candidate, maximizing) {
                pruned = true;
                break;
            }

            window.tighten(candidate, maximizing);
        }

        let best = if maximizing {
            candidates.iter().max()
        } else {
            candidates.iter().min()
        }
        .copied();

        // Cycles back into this node or below it come out the same whatever path led here
        let cycle_floor = cycle_floor.filter(|floor| *floor < depth);

        let best = match best {
            Some(best) => best,
            None => {
                if self.options.memoize {
                    self.table.remove(&fingerprint);
                }

                return Ok(Searched {
                    value: SearchValue::Unresolved,
                    cycle_floor,
                });
            }
        };

        if self.options.memoize {
            if pruned {
                self.table
                    .finalize_pruned_with_children(fingerprint, current_score, successors);
            } else if cycle_floor.is_some() {
                // Only holds while the node we cycled into is on the path
                debug!(actor, depth, best, "Not caching a value that leaned on a cycle");
                self.table.remove(&fingerprint);
            } else {
                self.table
                    .finalize_resolved(fingerprint, best, current_score, horizon);
            }
        }

        Ok(Searched {
            value: SearchValue::Value(best),
            cycle_floor,
        })
    }
}

impl<E, Ev> DecisionMaker<E> for MinimaxAgent<E, Ev>
where
    E: EnvironmentAdapter,
    Ev: Evaluator<E>,
{
    fn name(&self) -> &str {
        self.name
    }

    /// Pick the next action
    ///
    /// Every root successor is searched and the one with the strictly highest value wins. When
    /// two actions tie, the one generated first is kept. If nothing produced a value we stay
    /// put with [Action::Stop].
    fn choose_action_with_report(&mut self, state: &E::State) -> Result<SearchReport, E::Error> {
        info_span!(
            "choose_action",
            agent_name = self.name,
            chosen_action = field::Empty,
            chosen_score = field::Empty,
            nodes_expanded = field::Empty,
            table_size = field::Empty,
            elapsed_ms = field::Empty,
        )
        .in_scope(|| {
            let instruments = Instruments::start();
            let options = self.search_root(state, &instruments)?;

            let mut best: Option<(Action, i64)> = None;
            for (action, value) in &options {
                if let SearchValue::Value(v) = value {
                    if best.map_or(true, |(_, best_value)| *v > best_value) {
                        best = Some((*action, *v));
                    }
                }
            }

            let (action, score) = match best {
                Some((action, score)) => (action, Some(score)),
                None => {
                    warn!(
                        successors = options.len(),
                        "No root action has a value, staying put"
                    );
                    (Action::Stop, None)
                }
            };
            self.last_action = Some(action);
            self.last_root = Some(state.clone());

            let current_span = tracing::Span::current();
            current_span.record("chosen_action", field::display(action));
            if let Some(score) = score {
                current_span.record("chosen_score", score);
            }
            current_span.record("nodes_expanded", instruments.nodes_expanded());
            current_span.record("table_size", self.table.len() as u64);
            current_span.record("elapsed_ms", instruments.elapsed().as_millis() as u64);

            Ok(SearchReport {
                action,
                score,
                nodes_expanded: instruments.nodes_expanded(),
                elapsed: instruments.elapsed(),
                options,
            })
        })
    }
}
