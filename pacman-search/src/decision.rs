use std::time::Duration;

use text_trees::StringTreeNode;

use crate::{alphabeta::SearchValue, environment::EnvironmentAdapter, Action};

/// The per-turn entry point. A game loop calls [DecisionMaker::choose_action] once per turn and
/// plays whatever comes back.
///
/// Implementations always return a usable action for a well formed state. When the search can't
/// find anything they fall back to [Action::Stop]. The only errors are the ones the environment
/// itself reports.
pub trait DecisionMaker<E: EnvironmentAdapter> {
    /// A name for logs and reports
    fn name(&self) -> &str;

    /// Pick the next action, along with what it cost to pick it
    fn choose_action_with_report(&mut self, state: &E::State) -> Result<SearchReport, E::Error>;

    /// Pick the next action
    fn choose_action(&mut self, state: &E::State) -> Result<Action, E::Error> {
        Ok(self.choose_action_with_report(state)?.action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What happened during one call to [DecisionMaker::choose_action_with_report].
///
/// This is what benchmarking code consumes: the value of the chosen action, how long it took and
/// how many nodes were expanded to get there.
pub struct SearchReport {
    /// The action that was chosen
    pub action: Action,
    /// The value of the chosen action, when the engine computes one
    pub score: Option<i64>,
    /// Nodes whose successors were searched during this call
    pub nodes_expanded: u64,
    /// Wall time spent in this call
    pub elapsed: Duration,
    /// Every root action that was considered, in search order, with its value
    pub options: Vec<(Action, SearchValue)>,
}

impl SearchReport {
    /// This returns a visual representation of the root decision.
    /// It shows the chosen action and score, then each action that was considered
    pub fn to_text_tree(&self) -> String {
        let score = self
            .score
            .map_or_else(|| "-".to_owned(), |score| score.to_string());
        let mut node = StringTreeNode::new(format!("{} {}", self.action, score));

        for (action, value) in &self.options {
            node.push_node(StringTreeNode::new(format!("{} {}", action, value)));
        }

        format!("{}", node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_tree_lists_every_option() {
        let report = SearchReport {
            action: Action::East,
            score: Some(12),
            nodes_expanded: 3,
            elapsed: Duration::from_millis(1),
            options: vec![
                (Action::North, SearchValue::Value(4)),
                (Action::East, SearchValue::Value(12)),
                (Action::West, SearchValue::Unresolved),
            ],
        };

        let tree = report.to_text_tree();

        assert!(tree.starts_with("east 12"));
        assert!(tree.contains("north 4"));
        assert!(tree.contains("west unresolved"));
    }
}
