//! # picman-curve
//!
//! Piecewise-smooth tone curve model for PICMAN color adjustments.
//!
//! This crate provides [`Curve`], a 1D function y = f(x) over `[0, 1]`
//! used by levels/curves style tone adjustments. A curve is either
//! [`Smooth`](CurveKind::Smooth), defined by sparse control points and
//! rendered through cubic Bezier segments, or [`Free`](CurveKind::Free),
//! edited directly as a dense sample table. Either way the sample table
//! is the authoritative evaluation target.
//!
//! # Usage
//!
//! ```rust
//! use picman_curve::{Curve, CurveKind};
//!
//! let mut curve = Curve::new();
//!
//! // lift the midtones
//! curve.set_point(8, 0.5, 0.6).unwrap();
//! assert_eq!(curve.map_value(0.5), 0.6);
//!
//! // batch several edits into one recompute
//! {
//!     let mut edit = curve.edit();
//!     edit.set_point(4, 0.25, 0.2).unwrap();
//!     edit.set_point(12, 0.75, 0.9).unwrap();
//! }
//! ```
//!
//! # Evaluation
//!
//! [`Curve::map_value`] is a nearest-sample table lookup, branch-light
//! and allocation-free; it is called once per channel per pixel during
//! tone adjustment. All smoothing is baked into the table when the curve
//! is recomputed.
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//! - [`serde`] - Persisted curve state
//!
//! # Used By
//!
//! - `picman-tone` - Multi-channel curve and levels configs
//! - `picman-ops` - Per-pixel tone mapping

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod curve;
mod error;
mod spline;
mod state;
mod types;

pub use curve::{Curve, EditScope};
pub use error::{CurveError, CurveResult};
pub use types::{CurveKind, CurvePoint, DEFAULT_N_POINTS, DEFAULT_N_SAMPLES};
