use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Found path: the query start, the corners it turns at, and the goal.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Path {
    pub points: Vec<Point2<f64>>,
    /// Total cost under the cost function the search ran with.
    pub cost: f64,
}

impl Path {
    pub fn start(&self) -> Option<Point2<f64>> {
        self.points.first().copied()
    }

    pub fn goal(&self) -> Option<Point2<f64>> {
        self.points.last().copied()
    }

    /// Geometric length, independent of the cost function.
    pub fn length(&self) -> f64 {
        self.segments()
            .map(|(a, b)| nalgebra::distance(&a, &b))
            .sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_ignores_cost() {
        let path = Path {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(3.0, 4.0),
                Point2::new(3.0, 6.0),
            ],
            cost: 1.0,
        };
        assert_relative_eq!(path.length(), 7.0);
        assert_eq!(path.segments().count(), 2);
        assert_eq!(path.goal(), Some(Point2::new(3.0, 6.0)));
    }

    #[test]
    fn single_point_path_has_no_segments() {
        let path = Path {
            points: vec![Point2::new(1.0, 1.0)],
            cost: 0.0,
        };
        assert_eq!(path.segments().count(), 0);
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn serializes_points_as_arrays() {
        let path = Path {
            points: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 2.0)],
            cost: 2.5,
        };
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["points"][1], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["cost"], serde_json::json!(2.5));
    }
}
