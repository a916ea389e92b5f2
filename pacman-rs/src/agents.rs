//! The agent variants, from plain minimax to planning with A*.

use pacman_search::{
    a_star::PlanningAgent,
    alphabeta::{MinimaxAgent, SearchOptions},
    LinearEvaluator,
};

use super::*;

/// How far [HMinimaxFactory] agents search before estimating
pub const HMINIMAX_DEPTH: usize = 5;

/// Exact minimax without pruning. Positions already solved are still remembered, which is what
/// keeps it usable on anything but the smallest mazes
pub struct MinimaxFactory;

impl AgentFactory for MinimaxFactory {
    fn name(&self) -> String {
        "minimax".to_owned()
    }

    fn create(&self, maze: Maze) -> BoxedAgent {
        let options = SearchOptions {
            pruning: false,
            ..SearchOptions::alphabeta()
        };

        Box::new(MinimaxAgent::new(
            maze,
            LinearEvaluator::default(),
            "minimax",
            options,
        ))
    }
}

/// Exact minimax with Alpha-Beta pruning
pub struct AlphaBetaFactory;

impl AgentFactory for AlphaBetaFactory {
    fn name(&self) -> String {
        "alphabeta".to_owned()
    }

    fn create(&self, maze: Maze) -> BoxedAgent {
        Box::new(MinimaxAgent::new(
            maze,
            LinearEvaluator::default(),
            "alphabeta",
            SearchOptions::alphabeta(),
        ))
    }
}

/// Depth limited minimax that falls back to the linear evaluator
pub struct HMinimaxFactory;

impl AgentFactory for HMinimaxFactory {
    fn name(&self) -> String {
        "hminimax".to_owned()
    }

    fn create(&self, maze: Maze) -> BoxedAgent {
        Box::new(MinimaxAgent::new(
            maze,
            LinearEvaluator::default(),
            "hminimax",
            SearchOptions::bounded(HMINIMAX_DEPTH),
        ))
    }
}

/// Plans the whole game up front, ignoring ghosts
pub struct AStarFactory;

impl AgentFactory for AStarFactory {
    fn name(&self) -> String {
        "astar".to_owned()
    }

    fn create(&self, maze: Maze) -> BoxedAgent {
        Box::new(PlanningAgent::new(maze, "astar"))
    }
}
