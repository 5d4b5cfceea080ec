use std::fmt;

use mrvg_core::Rect;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ObstacleError;

/// Opaque handle to a live obstacle.
///
/// Handles are never reused, not even after a clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ObstacleId(u64);

impl ObstacleId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangular obstacle with an optional clearance buffer.
///
/// The buffer inflates the footprint uniformly; both sightlines and graph
/// nodes use the inflated footprint.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Obstacle {
    rect: Rect,
    buffer: f64,
}

impl Obstacle {
    pub fn new(rect: Rect) -> Result<Self, ObstacleError> {
        Self::with_buffer(rect, 0.0)
    }

    pub fn with_buffer(rect: Rect, buffer: f64) -> Result<Self, ObstacleError> {
        if !rect.is_finite() || !rect.has_positive_area() {
            return Err(ObstacleError::InvalidGeometry {
                width: rect.width(),
                height: rect.height(),
            });
        }
        if !buffer.is_finite() || buffer < 0.0 {
            return Err(ObstacleError::InvalidBuffer { buffer });
        }
        Ok(Self { rect, buffer })
    }

    /// Core rectangle as given by the caller, coordinates normalised.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn buffer(&self) -> f64 {
        self.buffer
    }

    /// Region that blocks sight and whose corners become graph nodes.
    pub fn footprint(&self) -> Rect {
        if self.buffer > 0.0 {
            self.rect.inflate(self.buffer)
        } else {
            self.rect
        }
    }

    /// Region blocking a segment whose endpoints include `relaxed` points.
    ///
    /// A query endpoint stranded inside the buffer zone (but outside the core
    /// rectangle) may still leave it, so for such segments only the core
    /// rectangle blocks.
    pub fn occluder(&self, relaxed: &[Point2<f64>]) -> Rect {
        if self.buffer > 0.0 && relaxed.iter().any(|p| self.in_buffer_zone(*p)) {
            self.rect
        } else {
            self.footprint()
        }
    }

    fn in_buffer_zone(&self, p: Point2<f64>) -> bool {
        self.footprint().contains_strict(p) && !self.rect.contains_strict(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_and_non_finite_rects() {
        let err = Obstacle::new(Rect::new(0.0, 0.0, 0.0, 5.0)).unwrap_err();
        assert_eq!(
            err,
            ObstacleError::InvalidGeometry {
                width: 0.0,
                height: 5.0
            }
        );
        assert!(Obstacle::new(Rect::new(0.0, 0.0, f64::INFINITY, 1.0)).is_err());
        assert!(Obstacle::new(Rect::new(0.0, f64::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn rejects_negative_buffer() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            Obstacle::with_buffer(rect, -0.5),
            Err(ObstacleError::InvalidBuffer { .. })
        ));
        assert!(Obstacle::with_buffer(rect, f64::NAN).is_err());
        assert!(Obstacle::with_buffer(rect, 0.0).is_ok());
    }

    #[test]
    fn buffer_inflates_footprint() {
        let obstacle = Obstacle::with_buffer(Rect::new(0.0, 0.0, 2.0, 1.0), 0.5).unwrap();
        assert_eq!(obstacle.footprint(), Rect::new(-0.5, -0.5, 2.5, 1.5));
        assert_eq!(obstacle.rect(), Rect::new(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn endpoint_in_buffer_zone_relaxes_occluder() {
        let obstacle = Obstacle::with_buffer(Rect::new(0.0, 0.0, 2.0, 2.0), 1.0).unwrap();
        let in_buffer = Point2::new(-0.5, 1.0);
        let outside = Point2::new(-3.0, 1.0);

        assert_eq!(obstacle.occluder(&[in_buffer]), obstacle.rect());
        assert_eq!(obstacle.occluder(&[outside]), obstacle.footprint());
        assert_eq!(obstacle.occluder(&[]), obstacle.footprint());
    }
}
