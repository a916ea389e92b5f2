//! Minimax for one maximizing actor against any number of minimizing adversaries.
//!
//! The adversaries are assumed to work together against the primary actor. Every node is scored
//! from the primary actor's point of view: we take the highest value when it's the primary actor's
//! turn and the lowest value on every adversary turn.
//!
//! On top of plain minimax the engine does three things:
//!
//! - Alpha-Beta pruning. Pruning is fail-hard: a node stops as soon as one child proves the parent
//!   won't pick it, and what it returns is only a bound. Such a node is cached as
//!   [TranspositionEntry::PrunedWithChildren](crate::transposition::TranspositionEntry) and is
//!   resumed, never reused as a final value
//! - A transposition table kept for the whole episode. Scores keep accumulating as the game goes
//!   on, so cached values are stored next to the score they were computed at and rebased on reuse
//! - An optional depth cutoff, past which the [Evaluator](crate::Evaluator) replaces the real value
//!
//! Maze states repeat, so the game graph has cycles. A node that shows up again on its own search
//! path is [SearchValue::Unresolved] and is ignored by its parent.
//!
//! ```rust
//! use pacman_search::{
//!     alphabeta::{MinimaxAgent, SearchOptions},
//!     DecisionMaker, LinearEvaluator,
//! };
//! # use pacman_search::{Action, ActorId, EnvironmentAdapter, Position};
//! # use std::convert::Infallible;
//! #
//! # // A corridor where the primary actor walks east to a single target
//! # #[derive(Debug)]
//! # struct Corridor;
//! # impl EnvironmentAdapter for Corridor {
//! #     type State = i32;
//! #     type Error = Infallible;
//! #     fn successors(&self, x: &i32, _: ActorId) -> Result<Vec<(i32, Action)>, Infallible> {
//! #         Ok(vec![(x + 1, Action::East), (x - 1, Action::West)])
//! #     }
//! #     fn legal_actions(&self, _: &i32, _: ActorId) -> Result<Vec<Action>, Infallible> {
//! #         Ok(vec![Action::East, Action::West])
//! #     }
//! #     fn is_terminal(&self, x: &i32) -> bool { x.abs() >= 3 }
//! #     fn is_win(&self, x: &i32) -> bool { *x >= 3 }
//! #     fn score(&self, x: &i32) -> i64 { if *x >= 3 { 10 } else { 0 } }
//! #     fn actor_count(&self, _: &i32) -> usize { 1 }
//! #     fn actor_position(&self, x: &i32, _: ActorId) -> Position { Position::new(*x, 0) }
//! #     fn remaining_targets(&self, x: &i32) -> Vec<Position> {
//! #         if *x >= 3 { vec![] } else { vec![Position::new(3, 0)] }
//! #     }
//! # }
//!
//! let mut agent = MinimaxAgent::new(
//!     Corridor,
//!     LinearEvaluator::default(),
//!     "alphabeta",
//!     SearchOptions::alphabeta(),
//! );
//!
//! assert_eq!(agent.choose_action(&0).unwrap(), Action::East);
//! ```

mod score;
pub use score::{PruningWindow, SearchValue};

mod eval;
pub use eval::{primary_successors, MinimaxAgent, SearchOptions};
