use crate::ObstacleId;

/// Errors returned by obstacle bookkeeping.
///
/// A failed call never modifies the store or the graph.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ObstacleError {
    #[error("obstacle must have positive finite width and height (width={width}, height={height})")]
    InvalidGeometry { width: f64, height: f64 },
    #[error("obstacle buffer must be finite and >= 0 (buffer={buffer})")]
    InvalidBuffer { buffer: f64 },
    #[error("obstacle {0} not found")]
    NotFound(ObstacleId),
}
