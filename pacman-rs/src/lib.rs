//! The agents that play [Maze] games, and the maze itself.
//!
//! Every agent is built through an [AgentFactory]. [all_factories] lists every agent we ship, and
//! [factory_by_name] looks one up the way a command line or a benchmark would.

use anyhow::anyhow;
use pacman_search::DecisionMaker;
use tracing::{debug, info, warn};

pub mod agents;
pub mod maze;

pub use maze::{Maze, MazeError, MazeFixture, MazeState};
pub use pacman_search::{Action, Position, SearchReport};

use crate::agents::{AStarFactory, AlphaBetaFactory, HMinimaxFactory, MinimaxFactory};

pub type BoxedAgent = Box<dyn DecisionMaker<Maze> + Send>;
pub type BoxedFactory = Box<dyn AgentFactory + Send + Sync>;

/// Builds a fresh agent for one episode on a given maze
pub trait AgentFactory {
    fn name(&self) -> String;
    fn create(&self, maze: Maze) -> BoxedAgent;
}

pub fn all_factories() -> Vec<BoxedFactory> {
    vec![
        Box::new(MinimaxFactory {}),
        Box::new(AlphaBetaFactory {}),
        Box::new(HMinimaxFactory {}),
        Box::new(AStarFactory {}),
    ]
}

pub fn factory_by_name(name: &str) -> anyhow::Result<BoxedFactory> {
    match all_factories()
        .into_iter()
        .find(|factory| factory.name() == name)
    {
        Some(factory) => {
            debug!(agent_name = name, "Found agent factory");
            Ok(factory)
        }
        None => {
            let known: Vec<String> = all_factories().iter().map(|f| f.name()).collect();
            warn!(agent_name = name, known = ?known, "Unknown agent requested");
            Err(anyhow!(
                "No agent named {}, try one of {}",
                name,
                known.join(", ")
            ))
        }
    }
}

/// Parse a JSON [MazeFixture] and build its maze
pub fn maze_from_fixture(json: &str) -> anyhow::Result<(MazeFixture, Maze)> {
    let fixture: MazeFixture = serde_json::from_str(json)?;
    let maze = fixture.maze()?;

    info!(
        fixture = %fixture.name,
        width = maze.width(),
        height = maze.height(),
        "Loaded maze fixture"
    );

    Ok((fixture, maze))
}
