//! # picman-ops
//!
//! Per-pixel application of [`picman_tone`] adjustments to interleaved
//! `f32` pixel buffers.
//!
//! Buffers are flat slices with 1, 2, 3, or 4 interleaved channels
//! (grayscale and RGB, each with optional trailing alpha). Every
//! operation comes in a serial and a rayon-parallel variant.
//!
//! # Example
//!
//! ```rust
//! use picman_ops::apply_curves;
//! use picman_tone::{Channel, CurvesConfig};
//!
//! let mut config = CurvesConfig::new();
//! config.curve_mut(Channel::Value).set_point(8, 0.5, 0.8).unwrap();
//!
//! let mut pixels = vec![0.25f32; 1920 * 4];
//! apply_curves(&config, &mut pixels, 4).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod curves;
mod error;
mod layout;
mod levels;

pub use curves::{apply_curves, par_apply_curves};
pub use error::{OpsError, OpsResult};
pub use levels::{apply_levels, par_apply_levels};
