//! Tone config error types.

use picman_curve::CurveError;
use thiserror::Error;

/// Result type for tone config operations.
pub type ToneResult<T> = Result<T, ToneError>;

/// Errors that can occur while building or loading tone configs.
#[derive(Debug, Error)]
pub enum ToneError {
    /// Parse error when loading legacy curves/levels files.
    #[error("parse error: {0}")]
    Parse(String),

    /// An underlying curve edit was rejected.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
