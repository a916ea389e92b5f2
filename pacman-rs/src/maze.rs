//! A small maze world for the agents to play in.
//!
//! Layouts are written as text, one character per cell:
//!
//! - `%` a wall
//! - `.` a food dot
//! - `P` pacman, exactly one
//! - `G` a ghost, any number
//! - ` ` an empty floor cell
//!
//! Pacman loses a point for every move, gains [FOOD_REWARD] for every dot and [WIN_REWARD] on top
//! for the last one. Running into a ghost, or being run into, costs [CAUGHT_PENALTY] and ends the
//! game.

use std::str::FromStr;

use itertools::Itertools;
use pacman_search::{Action, ActorId, EnvironmentAdapter, Position, PRIMARY_ACTOR};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points for eating a food dot
pub const FOOD_REWARD: i64 = 10;
/// Points for eating the last food dot, on top of [FOOD_REWARD]
pub const WIN_REWARD: i64 = 500;
/// Points lost when a ghost catches pacman
pub const CAUGHT_PENALTY: i64 = 500;
/// Points lost for every move pacman makes
pub const TIME_PENALTY: i64 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
/// Everything that can go wrong reading a layout or playing on a maze
pub enum MazeError {
    #[error("The layout has no rows")]
    EmptyLayout,

    #[error("Row {row} is {found} cells wide but the layout is {expected} cells wide")]
    RaggedRow {
        /// Zero based row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of this row
        found: usize,
    },

    #[error("Unknown tile {tile:?} at row {row}, column {column}")]
    UnknownTile {
        /// The character that was found
        tile: char,
        row: usize,
        column: usize,
    },

    #[error("The layout needs exactly one pacman, found {0}")]
    PacmanCount(usize),

    #[error("Actor {actor} is not in a game of {actor_count} actors")]
    UnknownActor {
        actor: ActorId,
        actor_count: usize,
    },

    #[error("Actor {actor} can't move {action} from here")]
    IllegalAction {
        actor: ActorId,
        action: Action,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Where everyone is, what is left to eat and the score so far
pub struct MazeState {
    pub pacman: Position,
    /// Ghost `i` is actor `i + 1`
    pub ghosts: Vec<Position>,
    /// Remaining food, kept sorted
    pub food: Vec<Position>,
    pub score: i64,
}

impl MazeState {
    /// Whether a ghost shares a cell with pacman
    pub fn is_caught(&self) -> bool {
        self.ghosts.contains(&self.pacman)
    }
}

#[derive(Debug, Clone)]
/// The fixed part of the world: its size, its walls and where the game starts
pub struct Maze {
    width: i32,
    height: i32,
    walls: FxHashSet<Position>,
    start: MazeState,
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = layout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.chars().collect())
            .collect();

        let width = rows.first().ok_or(MazeError::EmptyLayout)?.len();

        let mut walls = FxHashSet::default();
        let mut pacmen = vec![];
        let mut ghosts = vec![];
        let mut food = vec![];

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }

            for (column, tile) in cells.iter().enumerate() {
                let pos = Position::new(column as i32, row as i32);

                match tile {
                    '%' => {
                        walls.insert(pos);
                    }
                    '.' => food.push(pos),
                    'P' => pacmen.push(pos),
                    'G' => ghosts.push(pos),
                    ' ' => {}
                    &tile => return Err(MazeError::UnknownTile { tile, row, column }),
                }
            }
        }

        let pacman = match pacmen.as_slice() {
            [pacman] => *pacman,
            _ => return Err(MazeError::PacmanCount(pacmen.len())),
        };
        food.sort_unstable();

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            walls,
            start: MazeState {
                pacman,
                ghosts,
                food,
                score: 0,
            },
        })
    }
}

impl Maze {
    /// The state the layout describes
    pub fn initial_state(&self) -> MazeState {
        self.start.clone()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether an actor could stand on `pos`
    pub fn is_open(&self, pos: &Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && !self.walls.contains(pos)
    }

    fn check_actor(&self, state: &MazeState, actor: ActorId) -> Result<(), MazeError> {
        let actor_count = self.actor_count(state);

        if actor < actor_count {
            Ok(())
        } else {
            Err(MazeError::UnknownActor { actor, actor_count })
        }
    }

    fn moved(&self, state: &MazeState, actor: ActorId, action: Action) -> MazeState {
        let mut next = state.clone();

        if actor == PRIMARY_ACTOR {
            next.pacman = state.pacman.step(action);
            next.score -= TIME_PENALTY;

            if let Ok(i) = next.food.binary_search(&next.pacman) {
                next.food.remove(i);
                next.score += FOOD_REWARD;

                if next.food.is_empty() {
                    next.score += WIN_REWARD;
                }
            }
        } else {
            next.ghosts[actor - 1] = state.ghosts[actor - 1].step(action);
        }

        if next.is_caught() && !state.is_caught() {
            next.score -= CAUGHT_PENALTY;
        }

        next
    }

    /// Play a single action.
    ///
    /// Pacman idling leaves the state exactly as it is, the same way the search engines model it.
    pub fn apply(
        &self,
        state: &MazeState,
        actor: ActorId,
        action: Action,
    ) -> Result<MazeState, MazeError> {
        self.check_actor(state, actor)?;

        if actor == PRIMARY_ACTOR && action.is_idle() {
            return Ok(state.clone());
        }

        if !self.legal_actions(state, actor)?.contains(&action) {
            return Err(MazeError::IllegalAction { actor, action });
        }

        Ok(self.moved(state, actor, action))
    }

    /// Draw `state` back out in the layout format
    pub fn render(&self, state: &MazeState) -> String {
        (0..self.height)
            .map(|y| {
                (0..self.width).fold(String::new(), |mut row, x| {
                    let pos = Position::new(x, y);
                    let tile = if state.pacman == pos {
                        'P'
                    } else if state.ghosts.contains(&pos) {
                        'G'
                    } else if self.walls.contains(&pos) {
                        '%'
                    } else if state.food.binary_search(&pos).is_ok() {
                        '.'
                    } else {
                        ' '
                    };
                    row.push(tile);
                    row
                })
            })
            .join("\n")
    }
}

impl EnvironmentAdapter for Maze {
    type State = MazeState;
    type Error = MazeError;

    fn successors(
        &self,
        state: &MazeState,
        actor: ActorId,
    ) -> Result<Vec<(MazeState, Action)>, MazeError> {
        Ok(self
            .legal_actions(state, actor)?
            .into_iter()
            .map(|action| (self.moved(state, actor, action), action))
            .collect())
    }

    fn legal_actions(&self, state: &MazeState, actor: ActorId) -> Result<Vec<Action>, MazeError> {
        self.check_actor(state, actor)?;
        let from = self.actor_position(state, actor);

        Ok(Action::movements()
            .into_iter()
            .filter(|action| self.is_open(&from.step(*action)))
            .collect())
    }

    fn is_terminal(&self, state: &MazeState) -> bool {
        state.food.is_empty() || state.is_caught()
    }

    fn is_win(&self, state: &MazeState) -> bool {
        state.food.is_empty() && !state.is_caught()
    }

    fn score(&self, state: &MazeState) -> i64 {
        state.score
    }

    fn actor_count(&self, state: &MazeState) -> usize {
        state.ghosts.len() + 1
    }

    /// # Panics
    ///
    /// If `actor` is not pacman or one of the ghosts in `state`
    fn actor_position(&self, state: &MazeState, actor: ActorId) -> Position {
        if actor == PRIMARY_ACTOR {
            state.pacman
        } else {
            state.ghosts[actor - 1]
        }
    }

    fn remaining_targets(&self, state: &MazeState) -> Vec<Position> {
        state.food.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named layout stored as JSON, one string per row
pub struct MazeFixture {
    pub name: String,
    pub layout: Vec<String>,
    /// Length of the shortest winning plan with every ghost standing still, if known
    #[serde(default)]
    pub optimal_plan_length: Option<usize>,
}

impl MazeFixture {
    /// Parse the layout
    pub fn maze(&self) -> Result<Maze, MazeError> {
        self.layout.join("\n").parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "
%%%%%%
%P . %
% %%G%
%.   %
%%%%%%
";

    #[test]
    fn test_parse_layout() {
        let maze: Maze = LAYOUT.parse().unwrap();
        let state = maze.initial_state();

        assert_eq!(maze.width(), 6);
        assert_eq!(maze.height(), 5);
        assert_eq!(state.pacman, Position::new(1, 1));
        assert_eq!(state.ghosts, vec![Position::new(4, 2)]);
        assert_eq!(state.food, vec![Position::new(1, 3), Position::new(3, 1)]);
        assert_eq!(maze.actor_count(&state), 2);
        assert_eq!(maze.render(&state), LAYOUT.trim());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Maze>().unwrap_err(), MazeError::EmptyLayout);
        assert_eq!(
            "%%%\n%P\n%%%".parse::<Maze>().unwrap_err(),
            MazeError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            "%P%\n%x%".parse::<Maze>().unwrap_err(),
            MazeError::UnknownTile {
                tile: 'x',
                row: 1,
                column: 1
            }
        );
        assert_eq!(
            "%.G%".parse::<Maze>().unwrap_err(),
            MazeError::PacmanCount(0)
        );
        assert_eq!(
            "PP.".parse::<Maze>().unwrap_err(),
            MazeError::PacmanCount(2)
        );
    }

    #[test]
    fn test_legal_actions_respect_walls() {
        let maze: Maze = LAYOUT.parse().unwrap();
        let state = maze.initial_state();

        assert_eq!(
            maze.legal_actions(&state, PRIMARY_ACTOR).unwrap(),
            vec![Action::South, Action::East]
        );
        assert_eq!(
            maze.legal_actions(&state, 1).unwrap(),
            vec![Action::North, Action::South]
        );
        assert_eq!(
            maze.legal_actions(&state, 2).unwrap_err(),
            MazeError::UnknownActor {
                actor: 2,
                actor_count: 2
            }
        );
    }

    #[test]
    fn test_scoring() {
        let maze: Maze = "%P..%".parse().unwrap();
        let state = maze.initial_state();

        let state = maze.apply(&state, PRIMARY_ACTOR, Action::East).unwrap();
        assert_eq!(state.score, FOOD_REWARD - TIME_PENALTY);
        assert!(!maze.is_terminal(&state));

        let state = maze.apply(&state, PRIMARY_ACTOR, Action::East).unwrap();
        assert_eq!(state.score, 2 * (FOOD_REWARD - TIME_PENALTY) + WIN_REWARD);
        assert!(maze.is_win(&state));

        assert_eq!(
            maze.apply(&state, PRIMARY_ACTOR, Action::East).unwrap_err(),
            MazeError::IllegalAction {
                actor: PRIMARY_ACTOR,
                action: Action::East
            }
        );
    }

    #[test]
    fn test_caught_by_a_ghost() {
        let maze: Maze = "%P G.%".parse().unwrap();
        let state = maze.initial_state();

        let state = maze.apply(&state, PRIMARY_ACTOR, Action::East).unwrap();
        assert!(!state.is_caught());

        let state = maze.apply(&state, 1, Action::West).unwrap();
        assert!(state.is_caught());
        assert!(maze.is_terminal(&state));
        assert!(!maze.is_win(&state));
        assert_eq!(state.score, -TIME_PENALTY - CAUGHT_PENALTY);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_position_of_a_missing_ghost() {
        let maze: Maze = "%P G.%".parse().unwrap();
        let state = maze.initial_state();

        assert_eq!(maze.actor_position(&state, 1), Position::new(3, 0));
        maze.actor_position(&state, 2);
    }

    #[test]
    fn test_idling_keeps_the_state() {
        let maze: Maze = "%P.%".parse().unwrap();
        let state = maze.initial_state();

        assert_eq!(
            maze.apply(&state, PRIMARY_ACTOR, Action::Stop).unwrap(),
            state
        );
        assert!(maze
            .successors(&state, PRIMARY_ACTOR)
            .unwrap()
            .iter()
            .all(|(_, action)| !action.is_idle()));
    }
}
