use mrvg_graph::VisibilityParams;
use mrvg_path::PathfinderParams;
use serde::{Deserialize, Serialize};

/// Configuration of a [`crate::Graph`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphParams {
    pub visibility: VisibilityParams,
    pub pathfinder: PathfinderParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_partial_config() {
        let json = r#"{
            "visibility": { "tangent_pruning": true },
            "pathfinder": { "max_expansions": 5000 }
        }"#;
        let params: GraphParams = serde_json::from_str(json).unwrap();
        assert!(params.visibility.tangent_pruning);
        assert_eq!(params.visibility.quadtree.min_cell_size, 1.0);
        assert_eq!(params.pathfinder.max_expansions, Some(5000));
        assert!(params.pathfinder.use_heuristic);
    }

    #[test]
    fn empty_config_is_default() {
        let params: GraphParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, GraphParams::default());
    }
}
