//! Memoization of search results across the nodes of one decision and across the turns of one
//! episode.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{environment::Action, fingerprint::Fingerprint};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the table knows about a fingerprint
pub enum TranspositionEntry<S> {
    /// The node is open somewhere on the current search path
    InProgress,
    /// The node was fully searched
    Resolved {
        /// The best value found, relative to `baseline`
        score: i64,
        /// The environment score when `score` was computed
        baseline: i64,
        /// How many more plies the search was allowed to look past this node when it was
        /// resolved. `None` means it searched all the way to terminal states
        horizon: Option<usize>,
    },
    /// The node was cut off by pruning before all its children were seen. Its value is only a
    /// bound, so we keep the successors around to resume from instead
    PrunedWithChildren {
        /// The environment score when the node was pruned
        baseline: i64,
        /// Every successor the node had, visited or not
        successors: Vec<(S, Action)>,
    },
}

impl<S> TranspositionEntry<S> {
    /// The value of a resolved entry rebased onto a path that reached the same node with
    /// `current_score`.
    ///
    /// Scores keep accumulating along a path, so the cached value is shifted by whatever the new
    /// path scored more (or less) than the one that filled the entry.
    pub fn rebased_score(&self, current_score: i64) -> Option<i64> {
        match self {
            Self::Resolved {
                score, baseline, ..
            } => Some(score + (current_score - baseline)),
            _ => None,
        }
    }

    /// Whether a resolved value is good enough for a node that still needs `needed` plies of
    /// lookahead
    pub fn covers_horizon(&self, needed: Option<usize>) -> bool {
        match self {
            Self::Resolved { horizon: None, .. } => true,
            Self::Resolved {
                horizon: Some(have),
                ..
            } => matches!(needed, Some(needed) if *have >= needed),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
/// Maps [Fingerprint]s to [TranspositionEntry]s.
///
/// A table lives as long as the agent that owns it, which is one episode. Entries from earlier
/// turns are what makes later turns cheap.
///
/// Only values that hold whatever path reaches their node may be resolved here. A value found
/// while skipping a child that cycled back above the node is not one of them.
pub struct TranspositionTable<S> {
    entries: FxHashMap<Fingerprint, TranspositionEntry<S>>,
}

impl<S> Default for TranspositionTable<S> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<S> TranspositionTable<S> {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(missing_docs)]
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<&TranspositionEntry<S>> {
        self.entries.get(fingerprint)
    }

    /// Open a node. Returns whatever was stored for it before, so a pruned node can hand its
    /// successors back to the search
    pub fn mark_in_progress(&mut self, fingerprint: Fingerprint) -> Option<TranspositionEntry<S>> {
        self.entries
            .insert(fingerprint, TranspositionEntry::InProgress)
    }

    #[allow(missing_docs)]
    pub fn finalize_resolved(
        &mut self,
        fingerprint: Fingerprint,
        score: i64,
        baseline: i64,
        horizon: Option<usize>,
    ) {
        self.entries.insert(
            fingerprint,
            TranspositionEntry::Resolved {
                score,
                baseline,
                horizon,
            },
        );
    }

    #[allow(missing_docs)]
    pub fn finalize_pruned_with_children(
        &mut self,
        fingerprint: Fingerprint,
        baseline: i64,
        successors: Vec<(S, Action)>,
    ) {
        debug!(
            successors = successors.len(),
            "Keeping successors of a pruned node"
        );
        self.entries.insert(
            fingerprint,
            TranspositionEntry::PrunedWithChildren {
                baseline,
                successors,
            },
        );
    }

    /// Forget a node entirely. Used when none of its children produced a value, so that another
    /// path can try again later
    pub fn remove(&mut self, fingerprint: &Fingerprint) -> Option<TranspositionEntry<S>> {
        self.entries.remove(fingerprint)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Called at the end of an episode
    pub fn clear(&mut self) {
        self.entries.clear()
    }
}
