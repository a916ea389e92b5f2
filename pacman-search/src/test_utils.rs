//! Small environments used by the unit tests of this crate.

use std::{convert::Infallible, fmt::Display};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::environment::{Action, ActorId, EnvironmentAdapter, PRIMARY_ACTOR};
use crate::Position;

pub const FOOD_REWARD: i64 = 10;
pub const WIN_REWARD: i64 = 500;
pub const CAUGHT_PENALTY: i64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub actors: Vec<Position>,
    pub targets: Vec<Position>,
    pub score: i64,
}

/// A bounded grid with optional walls. Actor 0 collects targets, every other actor chases it.
#[derive(Debug, Clone)]
pub struct GridEnvironment {
    width: i32,
    height: i32,
    walls: FxHashSet<Position>,
}

impl GridEnvironment {
    pub fn open(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            walls: FxHashSet::default(),
        }
    }

    pub fn with_walls(mut self, walls: &[Position]) -> Self {
        self.walls.extend(walls.iter().copied());
        self
    }

    fn is_free(&self, pos: &Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && !self.walls.contains(pos)
    }

    fn caught(state: &GridState) -> bool {
        state.actors[1..].contains(&state.actors[PRIMARY_ACTOR])
    }
}

impl EnvironmentAdapter for GridEnvironment {
    type State = GridState;
    type Error = Infallible;

    fn successors(
        &self,
        state: &GridState,
        actor: ActorId,
    ) -> Result<Vec<(GridState, Action)>, Infallible> {
        Ok(self
            .legal_actions(state, actor)?
            .into_iter()
            .map(|action| {
                let mut next = state.clone();
                next.actors[actor] = state.actors[actor].step(action);

                if actor == PRIMARY_ACTOR {
                    next.score -= 1;
                    if let Some(i) = next.targets.iter().position(|t| *t == next.actors[actor]) {
                        next.targets.remove(i);
                        next.score += FOOD_REWARD;
                        if next.targets.is_empty() {
                            next.score += WIN_REWARD;
                        }
                    }
                }

                if Self::caught(&next) && !Self::caught(state) {
                    next.score -= CAUGHT_PENALTY;
                }

                (next, action)
            })
            .collect())
    }

    fn legal_actions(&self, state: &GridState, actor: ActorId) -> Result<Vec<Action>, Infallible> {
        let from = state.actors[actor];

        Ok(Action::movements()
            .into_iter()
            .filter(|action| self.is_free(&from.step(*action)))
            .collect())
    }

    fn is_terminal(&self, state: &GridState) -> bool {
        state.targets.is_empty() || Self::caught(state)
    }

    fn is_win(&self, state: &GridState) -> bool {
        state.targets.is_empty() && !Self::caught(state)
    }

    fn score(&self, state: &GridState) -> i64 {
        state.score
    }

    fn actor_count(&self, state: &GridState) -> usize {
        state.actors.len()
    }

    fn actor_position(&self, state: &GridState, actor: ActorId) -> Position {
        state.actors[actor]
    }

    fn remaining_targets(&self, state: &GridState) -> Vec<Position> {
        state.targets.clone()
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub position: i32,
    pub score: i64,
    pub terminal: bool,
    pub broken: bool,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphError(pub usize);

impl Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node {} is broken", self.0)
    }
}

impl std::error::Error for GraphError {}

/// An explicit game graph. States are node indices; the actor to move is implied by the depth
/// the engine reaches a node at. A node's children get the movement actions in order.
///
/// Unless placed explicitly every node gets its own position, so fingerprints only collide where
/// a test asks them to.
#[derive(Debug, Clone)]
pub struct GraphEnvironment {
    pub nodes: Vec<GraphNode>,
    actors: usize,
}

impl GraphEnvironment {
    pub fn new(actors: usize) -> Self {
        Self {
            nodes: vec![],
            actors,
        }
    }

    pub fn leaf(&mut self, score: i64) -> usize {
        let position = self.nodes.len() as i32;
        self.push(position, score, true, vec![])
    }

    pub fn node(&mut self, score: i64, children: &[usize]) -> usize {
        let position = self.nodes.len() as i32;
        self.push(position, score, false, children.to_vec())
    }

    /// A non-terminal node that shares its fingerprint with every other node at `position`
    pub fn node_at(&mut self, position: i32, score: i64, children: &[usize]) -> usize {
        self.push(position, score, false, children.to_vec())
    }

    pub fn set_children(&mut self, node: usize, children: &[usize]) {
        self.nodes[node].children = children.to_vec();
    }

    pub fn break_node(&mut self, node: usize) {
        self.nodes[node].broken = true;
    }

    fn push(&mut self, position: i32, score: i64, terminal: bool, children: Vec<usize>) -> usize {
        self.nodes.push(GraphNode {
            position,
            score,
            terminal,
            broken: false,
            children,
        });
        self.nodes.len() - 1
    }

    /// A random tree where every internal node has 2 to 4 children and every leaf is terminal
    /// with a score in `-50..50`. Returns the root
    pub fn random_tree(actors: usize, depth: usize, seed: u64) -> (Self, usize) {
        let mut env = Self::new(actors);
        let mut rng = StdRng::seed_from_u64(seed);
        let root = env.random_subtree(&mut rng, depth);

        (env, root)
    }

    fn random_subtree(&mut self, rng: &mut StdRng, depth: usize) -> usize {
        if depth == 0 {
            return self.leaf(rng.gen_range(-50..50));
        }

        let children: Vec<usize> = (0..rng.gen_range(2..=4))
            .map(|_| self.random_subtree(rng, depth - 1))
            .collect();

        self.node(0, &children)
    }

    /// Like [Self::random_tree], except the root's children each lead into a copy of one shared
    /// subtree. The copies sit at the same positions, so they share fingerprints, but every copy
    /// is reached with its own score and every alternative next to it is random. Returns the root
    pub fn random_transposed_tree(actors: usize, depth: usize, seed: u64) -> (Self, usize) {
        let mut env = Self::new(actors);
        let mut rng = StdRng::seed_from_u64(seed);
        let shared = Template::random(&mut rng, depth);

        let wrappers: Vec<usize> = (0..rng.gen_range(2..=4))
            .map(|_| {
                let offset = rng.gen_range(-40..40);
                let alternative = env.leaf(offset + rng.gen_range(-50..50));
                let copy = env.instantiate(&shared, &mut 10_000, offset);

                env.node(offset, &[alternative, copy])
            })
            .collect();
        let root = env.node(0, &wrappers);

        (env, root)
    }

    fn instantiate(&mut self, template: &Template, next_position: &mut i32, offset: i64) -> usize {
        match template {
            Template::Leaf(score) => self.leaf(score + offset),
            Template::Node(children) => {
                let position = *next_position;
                *next_position += 1;

                let children: Vec<usize> = children
                    .iter()
                    .map(|child| self.instantiate(child, next_position, offset))
                    .collect();

                self.node_at(position, offset, &children)
            }
        }
    }
}

/// The shape of a subtree, before it is placed in a graph
#[derive(Debug, Clone)]
enum Template {
    Leaf(i64),
    Node(Vec<Template>),
}

impl Template {
    fn random(rng: &mut StdRng, depth: usize) -> Self {
        if depth == 0 {
            return Template::Leaf(rng.gen_range(-50..50));
        }

        Template::Node(
            (0..rng.gen_range(2..=3))
                .map(|_| Self::random(rng, depth - 1))
                .collect(),
        )
    }
}

impl EnvironmentAdapter for GraphEnvironment {
    type State = usize;
    type Error = GraphError;

    fn successors(&self, state: &usize, _actor: ActorId) -> Result<Vec<(usize, Action)>, GraphError> {
        let node = &self.nodes[*state];
        if node.broken {
            return Err(GraphError(*state));
        }

        Ok(node
            .children
            .iter()
            .zip(Action::movements().into_iter().cycle())
            .map(|(child, action)| (*child, action))
            .collect())
    }

    fn legal_actions(&self, _state: &usize, _actor: ActorId) -> Result<Vec<Action>, GraphError> {
        Ok(Action::movements().to_vec())
    }

    fn is_terminal(&self, state: &usize) -> bool {
        self.nodes[*state].terminal
    }

    fn is_win(&self, state: &usize) -> bool {
        self.nodes[*state].terminal && self.nodes[*state].score > 0
    }

    fn score(&self, state: &usize) -> i64 {
        self.nodes[*state].score
    }

    fn actor_count(&self, _state: &usize) -> usize {
        self.actors
    }

    fn actor_position(&self, state: &usize, _actor: ActorId) -> Position {
        Position::new(self.nodes[*state].position, 0)
    }

    fn remaining_targets(&self, _state: &usize) -> Vec<Position> {
        vec![]
    }
}

/// Plain minimax straight from the definition, no pruning, no memoization, no cycles allowed.
/// Returns the value of every root successor
pub fn reference_minimax(env: &GraphEnvironment, root: usize) -> Vec<(Action, i64)> {
    fn value(env: &GraphEnvironment, node: usize, actor: ActorId) -> i64 {
        if env.is_terminal(&node) {
            return env.score(&node);
        }

        let next = (actor + 1) % env.actors;
        let values = env.nodes[node]
            .children
            .iter()
            .map(|child| value(env, *child, next));

        if actor == PRIMARY_ACTOR {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    env.successors(&root, PRIMARY_ACTOR)
        .unwrap()
        .into_iter()
        .map(|(child, action)| (action, value(env, child, 1 % env.actors)))
        .collect()
}
