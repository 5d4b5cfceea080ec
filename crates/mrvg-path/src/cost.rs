//! Edge cost functions.
//!
//! Costs must be non-negative. The search does not guard against negative
//! costs beyond a warning; with them the result may be non-minimal.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Cost of moving in a straight line between two positions.
pub trait CostFn {
    fn cost(&self, from: Point2<f64>, to: Point2<f64>) -> f64;

    /// Largest known `k` such that `cost(a, b) >= k * |b - a|` everywhere.
    ///
    /// Enables A* with a straight-line heuristic. `None` falls back to
    /// Dijkstra.
    fn euclidean_lower_bound(&self) -> Option<f64> {
        None
    }
}

impl<F> CostFn for F
where
    F: Fn(Point2<f64>, Point2<f64>) -> f64,
{
    fn cost(&self, from: Point2<f64>, to: Point2<f64>) -> f64 {
        self(from, to)
    }
}

/// Straight-line distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Euclidean;

impl CostFn for Euclidean {
    fn cost(&self, from: Point2<f64>, to: Point2<f64>) -> f64 {
        nalgebra::distance(&from, &to)
    }

    fn euclidean_lower_bound(&self) -> Option<f64> {
        Some(1.0)
    }
}

/// Euclidean distance after scaling each axis, for anisotropic terrain
/// (e.g. cheap vertical movement).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct AxisWeighted {
    pub x: f64,
    pub y: f64,
}

impl AxisWeighted {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl CostFn for AxisWeighted {
    fn cost(&self, from: Point2<f64>, to: Point2<f64>) -> f64 {
        let d = to - from;
        (self.x * d.x).hypot(self.y * d.y)
    }

    fn euclidean_lower_bound(&self) -> Option<f64> {
        let k = self.x.abs().min(self.y.abs());
        (k > 0.0 && k.is_finite()).then_some(k)
    }
}
