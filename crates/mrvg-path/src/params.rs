use serde::{Deserialize, Serialize};

/// Search tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathfinderParams {
    /// Run A* when the cost function reports a Euclidean lower bound,
    /// Dijkstra otherwise.
    pub use_heuristic: bool,
    /// Give up (report no path) after this many node expansions.
    pub max_expansions: Option<usize>,
}

impl Default for PathfinderParams {
    fn default() -> Self {
        Self {
            use_heuristic: true,
            max_expansions: None,
        }
    }
}
