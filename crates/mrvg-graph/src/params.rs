use serde::{Deserialize, Serialize};

/// Quad tree tuning for the obstacle index.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuadTreeParams {
    /// Cells are not split below this side length.
    pub min_cell_size: f64,
}

impl Default for QuadTreeParams {
    fn default() -> Self {
        Self { min_cell_size: 1.0 }
    }
}

/// Parameters of the visibility graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VisibilityParams {
    /// Keep only edges that are tangent to the silhouette at both corner
    /// endpoints.
    ///
    /// Shortest paths are unaffected, as long as occlusion treats touching
    /// obstacles as one silhouette (it does), and the graph gets much
    /// sparser. An edge then no longer exists for *every* unobstructed pair
    /// of active nodes.
    pub tangent_pruning: bool,

    pub quadtree: QuadTreeParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: VisibilityParams = serde_json::from_str(r#"{ "tangent_pruning": true }"#).unwrap();
        assert!(params.tangent_pruning);
        assert_eq!(params.quadtree, QuadTreeParams::default());

        let params: VisibilityParams =
            serde_json::from_str(r#"{ "quadtree": { "min_cell_size": 0.25 } }"#).unwrap();
        assert!(!params.tangent_pruning);
        assert_eq!(params.quadtree.min_cell_size, 0.25);
    }
}
