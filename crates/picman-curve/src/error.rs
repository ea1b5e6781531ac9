//! Curve error types.

use thiserror::Error;

/// Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur during curve operations.
#[derive(Debug, Error)]
pub enum CurveError {
    /// Control point index outside the point array.
    #[error("point index {index} out of range (n_points = {n_points})")]
    InvalidPoint {
        /// Requested index.
        index: usize,
        /// Number of point slots in the curve.
        n_points: usize,
    },

    /// Coordinate outside its allowed domain.
    #[error("coordinate {value} outside [0, 1] (or -1 for an unset point)")]
    InvalidCoordinate {
        /// Offending value.
        value: f64,
    },

    /// Byte export requested with a sample count the curve does not have.
    #[error("sample count mismatch: requested {requested}, curve has {actual}")]
    SampleCountMismatch {
        /// Requested sample count.
        requested: usize,
        /// Actual sample count of the curve.
        actual: usize,
    },
}
