use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The result of searching a node.
///
/// A node is `Unresolved` when it can't be scored along the current path: either it closes a
/// cycle back onto one of its ancestors, or every one of its children was unresolved. This is not
/// a loss and not a zero, parents simply leave it out of their choice.
pub enum SearchValue {
    /// The minimax value of the node
    Value(i64),
    /// No value along this path
    Unresolved,
}

impl SearchValue {
    /// The value, if there is one
    pub fn value(&self) -> Option<i64> {
        match self {
            SearchValue::Value(v) => Some(*v),
            SearchValue::Unresolved => None,
        }
    }

    #[allow(missing_docs)]
    pub fn is_resolved(&self) -> bool {
        matches!(self, SearchValue::Value(_))
    }
}

impl From<Option<i64>> for SearchValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SearchValue::Unresolved, SearchValue::Value)
    }
}

impl Display for SearchValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchValue::Value(v) => write!(f, "{}", v),
            SearchValue::Unresolved => write!(f, "unresolved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The `(lower, upper)` range a node's value still has to fall in to matter to its parent.
///
/// Each node starts its own window at [PruningWindow::full] and narrows it as children come back.
/// Children receive a copy of it as their parent window and use it only to decide when to stop.
pub struct PruningWindow {
    /// The best value the maximizing side is already guaranteed
    pub lower: i64,
    /// The best value the minimizing side is already guaranteed
    pub upper: i64,
}

impl Default for PruningWindow {
    fn default() -> Self {
        Self::full()
    }
}

impl PruningWindow {
    /// A window nothing falls outside of
    pub const fn full() -> Self {
        Self {
            lower: i64::MIN,
            upper: i64::MAX,
        }
    }

    /// Whether a child value makes the rest of the siblings irrelevant to the parent.
    ///
    /// A maximizing node stops once it has found something the minimizing parent would never
    /// allow, and vice versa.
    pub fn should_prune(&self, candidate: i64, maximizing: bool) -> bool {
        if maximizing {
            candidate >= self.upper
        } else {
            candidate <= self.lower
        }
    }

    /// Narrow the window with a value this node can now guarantee
    pub fn tighten(&mut self, candidate: i64, maximizing: bool) {
        if maximizing {
            self.lower = self.lower.max(candidate);
        } else {
            self.upper = self.upper.min(candidate);
        }
    }
}
