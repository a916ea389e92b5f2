//! The boundary between the search engines and the world they search over.
//!
//! The engines never look inside a state. Everything they need to know comes through the
//! [EnvironmentAdapter] trait.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// Index of an actor in a state. The primary (maximizing) actor is always [PRIMARY_ACTOR], every
/// other index is an adversary.
pub type ActorId = usize;

/// The actor the engines choose actions for
pub const PRIMARY_ACTOR: ActorId = 0;

/// Number of movement actions, i.e. how many successors a primary actor has in the open
pub const FULL_BRANCHING_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// An action an actor can take on a turn
pub enum Action {
    #[allow(missing_docs)]
    North,
    #[allow(missing_docs)]
    South,
    #[allow(missing_docs)]
    East,
    #[allow(missing_docs)]
    West,
    /// The idle action. It never moves the actor
    Stop,
}

impl Action {
    /// All the movement actions, in the order the reference environments generate them
    pub const fn movements() -> [Action; FULL_BRANCHING_FACTOR] {
        [Action::North, Action::South, Action::East, Action::West]
    }

    /// Whether this is the idle action
    pub fn is_idle(&self) -> bool {
        matches!(self, Action::Stop)
    }

    /// The `(dx, dy)` this action moves an actor by. `y` grows downwards, matching how layouts
    /// are written
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::North => (0, -1),
            Action::South => (0, 1),
            Action::East => (1, 0),
            Action::West => (-1, 0),
            Action::Stop => (0, 0),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::North => "north",
            Action::South => "south",
            Action::East => "east",
            Action::West => "west",
            Action::Stop => "stop",
        };

        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// A cell on the grid
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells
    pub fn dist_from(&self, other: &Self) -> i64 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()).into()
    }

    /// The cell reached by taking `action` from here, ignoring walls
    pub fn step(&self, action: Action) -> Self {
        let (dx, dy) = action.delta();

        Self::new(self.x + dx, self.y + dy)
    }
}

/// Everything the engines are allowed to know about the world.
///
/// Implementations are free to fail. Any error is passed back out of the engines unchanged,
/// a search never tries to recover from a broken environment.
///
/// The order of [EnvironmentAdapter::successors] matters. It is the order children are searched
/// in, and when two actions are worth the same the one generated first wins.
pub trait EnvironmentAdapter {
    /// The world state. The engines clone it but never mutate it
    type State: Clone + Debug;
    /// What the environment reports when it is handed something it can't work with
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every `(next_state, action)` pair available to `actor` in `state`.
    ///
    /// For the [PRIMARY_ACTOR] this should only contain movements. Whether the idle action is
    /// available depends on the path taken to `state`, so the engines add it themselves.
    fn successors(
        &self,
        state: &Self::State,
        actor: ActorId,
    ) -> Result<Vec<(Self::State, Action)>, Self::Error>;

    /// Movement actions `actor` could take right now. Never includes [Action::Stop]
    fn legal_actions(&self, state: &Self::State, actor: ActorId)
        -> Result<Vec<Action>, Self::Error>;

    /// Whether the game is over, won or lost
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Whether the game is over and the primary actor won
    fn is_win(&self, state: &Self::State) -> bool;

    /// The score of the game so far, from the primary actor's point of view
    fn score(&self, state: &Self::State) -> i64;

    /// How many actors take turns, the primary actor included
    fn actor_count(&self, state: &Self::State) -> usize;

    /// Where `actor` currently is.
    ///
    /// The engines only ask about actors below [EnvironmentAdapter::actor_count], implementations
    /// are free to panic on anything else.
    fn actor_position(&self, state: &Self::State, actor: ActorId) -> Position;

    /// The targets the primary actor still has to reach to win
    fn remaining_targets(&self, state: &Self::State) -> Vec<Position>;
}

/// Whether the primary actor may stay where it is.
///
/// Staying still is only possible when the previous action was itself idle, or when it was a
/// movement that is no longer legal (the actor ran into a wall). With no previous action we can't
/// tell, so idling is not offered.
pub fn idle_available(previous_action: Option<Action>, legal_actions: &[Action]) -> bool {
    match previous_action {
        None => false,
        Some(Action::Stop) => true,
        Some(previous) => {
            let movements = legal_actions.iter().filter(|a| !a.is_idle()).count();

            movements < FULL_BRANCHING_FACTOR && !legal_actions.contains(&previous)
        }
    }
}
