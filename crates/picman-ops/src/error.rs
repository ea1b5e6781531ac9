//! Error types for pixel operations.

use thiserror::Error;

/// Error type for pixel operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer length does not match the pixel layout.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Pixel layout with an unsupported channel count.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(usize),
}

/// Result type for pixel operations.
pub type OpsResult<T> = Result<T, OpsError>;
