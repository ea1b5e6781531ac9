//! Core types for the curve model.

use serde::{Deserialize, Serialize};

/// Default number of control point slots.
pub const DEFAULT_N_POINTS: usize = 17;

/// Default number of entries in the sample table.
pub const DEFAULT_N_SAMPLES: usize = 256;

/// Representation of a tone curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveKind {
    /// Defined by sparse control points, interpolated with Bezier segments.
    #[default]
    Smooth,
    /// Edited directly as a dense sample table; control points are inert.
    Free,
}

/// A control point on a [`Smooth`](CurveKind::Smooth) curve.
///
/// Coordinates are in `[0, 1]`, or `(-1, -1)` for an unset slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Input position.
    pub x: f64,
    /// Output value.
    pub y: f64,
}

impl CurvePoint {
    /// Sentinel for an inactive control point slot.
    pub const INACTIVE: CurvePoint = CurvePoint { x: -1.0, y: -1.0 };

    /// Create a new control point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether this slot holds a placed point.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.x >= 0.0
    }
}

impl Default for CurvePoint {
    fn default() -> Self {
        Self::INACTIVE
    }
}
