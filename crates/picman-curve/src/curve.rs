//! The curve model and its edit operations.

use crate::error::{CurveError, CurveResult};
use crate::spline;
use crate::types::{CurveKind, CurvePoint, DEFAULT_N_POINTS, DEFAULT_N_SAMPLES};
use std::ops::{Deref, DerefMut};

/// A 1D tone-mapping function over `[0, 1]`.
///
/// The curve holds two representations: a sparse control-point array that
/// defines a [`Smooth`](CurveKind::Smooth) curve, and a dense sample table
/// that is the ground truth for evaluation in both modes. Smooth edits
/// re-render the table through Bezier segments; [`Free`](CurveKind::Free)
/// edits write the table directly.
///
/// # Example
///
/// ```rust
/// use picman_curve::Curve;
///
/// let mut curve = Curve::new();
/// curve.set_point(8, 0.5, 0.8).unwrap();
///
/// assert_eq!(curve.map_value(0.5), 0.8);
/// assert!(curve.map_value(0.25) > 0.25);
/// ```
#[derive(Debug)]
pub struct Curve {
    kind: CurveKind,
    points: Vec<CurvePoint>,
    samples: Vec<f64>,
    identity: bool,
    freeze_depth: usize,
    pending: bool,
}

impl Curve {
    /// Creates an identity curve with the default 17 point slots and
    /// 256 samples.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_N_POINTS, DEFAULT_N_SAMPLES)
    }

    /// Creates an identity curve with explicit array sizes.
    ///
    /// # Panics
    ///
    /// Panics if either size is below 2; the boundary anchors and the
    /// sample ramp need at least two entries.
    pub fn with_size(n_points: usize, n_samples: usize) -> Self {
        assert!(n_points >= 2, "curve needs at least 2 point slots");
        assert!(n_samples >= 2, "curve needs at least 2 samples");

        let mut curve = Self {
            kind: CurveKind::Smooth,
            points: vec![CurvePoint::INACTIVE; n_points],
            samples: vec![0.0; n_samples],
            identity: false,
            freeze_depth: 0,
            pending: false,
        };
        curve.reset(true);
        curve
    }

    /// Reinitializes the curve to the identity mapping.
    ///
    /// Samples become the ramp `i / (n - 1)`, the boundary points are
    /// re-anchored at `(0, 0)` and `(1, 1)`, interior points become
    /// inactive. With `reset_kind` the representation is also forced back
    /// to [`CurveKind::Smooth`].
    pub fn reset(&mut self, reset_kind: bool) {
        let n_samples = self.samples.len();
        for (i, sample) in self.samples.iter_mut().enumerate() {
            *sample = i as f64 / (n_samples - 1) as f64;
        }

        self.reset_points();

        if reset_kind {
            self.kind = CurveKind::Smooth;
        }

        self.identity = true;
    }

    fn reset_points(&mut self) {
        let n_points = self.points.len();
        self.points.fill(CurvePoint::INACTIVE);
        self.points[0] = CurvePoint::new(0.0, 0.0);
        self.points[n_points - 1] = CurvePoint::new(1.0, 1.0);
    }

    /// The current representation.
    #[inline]
    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Switches the representation, approximately preserving the visual
    /// curve.
    ///
    /// Switching to [`Smooth`](CurveKind::Smooth) derives a subset of
    /// control points from the current sample table, so a
    /// Smooth→Free→Smooth round trip keeps the shape up to spline-fit
    /// error. Switching to [`Free`](CurveKind::Free) keeps the samples
    /// untouched; they already are the ground truth.
    pub fn set_kind(&mut self, kind: CurveKind) {
        if self.kind == kind {
            return;
        }

        self.kind = kind;

        if kind == CurveKind::Smooth {
            self.pick_points_from_samples();
        }

        self.mark_dirty();
    }

    /// Derive evenly spread control points from the sample table.
    pub(crate) fn pick_points_from_samples(&mut self) {
        let n_points = self.points.len();
        let n_samples = self.samples.len();

        self.points.fill(CurvePoint::INACTIVE);

        let n = 9usize.clamp(n_points / 2, n_points);

        for i in 0..n {
            let sample = i * (n_samples - 1) / (n - 1);
            let slot = i * (n_points - 1) / (n - 1);

            self.points[slot] = CurvePoint::new(
                sample as f64 / (n_samples - 1) as f64,
                self.samples[sample],
            );
        }
    }

    /// Number of control point slots.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Number of entries in the sample table.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Resizes the control-point array, re-establishing the boundary
    /// anchors and clearing all interior points. No-op if the size is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `n_points` is below 2, same as [`with_size`](Self::with_size).
    pub fn set_n_points(&mut self, n_points: usize) {
        if n_points == self.points.len() {
            return;
        }
        assert!(n_points >= 2, "curve needs at least 2 point slots");

        self.points = vec![CurvePoint::INACTIVE; n_points];
        self.reset_points();

        if self.kind == CurveKind::Smooth {
            self.identity = true;
        }
    }

    /// Resizes the sample table, refilling it with the identity ramp.
    /// No-op if the size is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `n_samples` is below 2, same as [`with_size`](Self::with_size).
    pub fn set_n_samples(&mut self, n_samples: usize) {
        if n_samples == self.samples.len() {
            return;
        }
        assert!(n_samples >= 2, "curve needs at least 2 samples");

        self.samples = (0..n_samples)
            .map(|i| i as f64 / (n_samples - 1) as f64)
            .collect();

        if self.kind == CurveKind::Free {
            self.identity = true;
        }
    }

    /// Index of the active control point closest to `x`.
    ///
    /// When no active point lies within `1 / (2 * n_points)` of `x`, the
    /// position-based fallback `round(x * (n_points - 1))` is returned
    /// instead, so a usable slot index always comes back. Ties keep the
    /// first point in index order.
    pub fn closest_point(&self, x: f64) -> usize {
        let n_points = self.points.len();
        let mut closest = 0;
        let mut distance = f64::MAX;

        for (i, point) in self.points.iter().enumerate() {
            if point.is_active() && (x - point.x).abs() < distance {
                distance = (x - point.x).abs();
                closest = i;
            }
        }

        if distance > 1.0 / (n_points as f64 * 2.0) {
            closest = (x * (n_points - 1) as f64).round() as usize;
        }

        closest
    }

    /// Places the control point `index` at `(x, y)`.
    ///
    /// Both coordinates must be in `[0, 1]`, or `-1.0` to unset the slot.
    /// Silently does nothing when the curve is in free mode; UI code calls
    /// point mutators unconditionally.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) -> CurveResult<()> {
        self.check_point_index(index)?;
        check_point_coord(x)?;
        check_point_coord(y)?;

        if self.kind == CurveKind::Free {
            return Ok(());
        }

        self.points[index] = CurvePoint::new(x, y);
        self.mark_dirty();

        Ok(())
    }

    /// Moves the control point `index` to a new y value, keeping x fixed.
    ///
    /// Silently does nothing in free mode.
    pub fn move_point(&mut self, index: usize, y: f64) -> CurveResult<()> {
        self.check_point_index(index)?;
        if !(0.0..=1.0).contains(&y) {
            return Err(CurveError::InvalidCoordinate { value: y });
        }

        if self.kind == CurveKind::Free {
            return Ok(());
        }

        self.points[index].y = y;
        self.mark_dirty();

        Ok(())
    }

    /// Deletes the control point `index`.
    ///
    /// The boundary slots are reset to their canonical anchors `(0, 0)`
    /// and `(1, 1)` instead of becoming inactive; interior slots become
    /// inactive.
    pub fn delete_point(&mut self, index: usize) -> CurveResult<()> {
        self.check_point_index(index)?;

        let last = self.points.len() - 1;

        if index == 0 {
            self.points[0] = CurvePoint::new(0.0, 0.0);
        } else if index == last {
            self.points[last] = CurvePoint::new(1.0, 1.0);
        } else {
            self.points[index] = CurvePoint::INACTIVE;
        }

        self.mark_dirty();

        Ok(())
    }

    /// The control point at `index`.
    ///
    /// Always `(-1, -1)` in free mode, where control points carry no
    /// meaning.
    pub fn point(&self, index: usize) -> CurveResult<CurvePoint> {
        self.check_point_index(index)?;

        if self.kind == CurveKind::Free {
            return Ok(CurvePoint::INACTIVE);
        }

        Ok(self.points[index])
    }

    /// Raw control-point storage, regardless of curve kind.
    #[inline]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// The dense sample table.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Free-mode direct sample edit: writes `y` to the sample nearest to
    /// `x`. Silently does nothing in smooth mode.
    pub fn set_curve_value(&mut self, x: f64, y: f64) -> CurveResult<()> {
        if !(0.0..=1.0).contains(&x) {
            return Err(CurveError::InvalidCoordinate { value: x });
        }
        if !(0.0..=1.0).contains(&y) {
            return Err(CurveError::InvalidCoordinate { value: y });
        }

        if self.kind == CurveKind::Smooth {
            return Ok(());
        }

        let index = spline::sample_index(x, self.samples.len());
        self.samples[index] = y;
        self.mark_dirty();

        Ok(())
    }

    /// Whether the curve is known to map every value to itself.
    ///
    /// This is a coarse optimization hint, not a precise predicate: any
    /// edit clears it, and recomputation never re-derives it from content.
    /// Only [`reset`](Self::reset) and the resize operations set it true.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Looks up the output value for input `x` in the sample table.
    ///
    /// Nearest-sample lookup with index clamping; all smoothing is already
    /// baked into the table.
    #[inline]
    pub fn map_value(&self, x: f64) -> f64 {
        let max = (self.samples.len() - 1) as f64;
        let index = (x * max).round().clamp(0.0, max) as usize;

        self.samples[index]
    }

    /// Exports the sample table as 8-bit values.
    ///
    /// `n_samples` must match the curve's sample count exactly, and `out`
    /// must have that length; there is no resampling. Values are scaled by
    /// 255.999 and truncated, biasing away from floor artifacts at the top
    /// of the range.
    pub fn to_bytes(&self, n_samples: usize, out: &mut [u8]) -> CurveResult<()> {
        if n_samples != self.samples.len() {
            return Err(CurveError::SampleCountMismatch {
                requested: n_samples,
                actual: self.samples.len(),
            });
        }
        if out.len() != n_samples {
            return Err(CurveError::SampleCountMismatch {
                requested: out.len(),
                actual: self.samples.len(),
            });
        }

        for (byte, sample) in out.iter_mut().zip(&self.samples) {
            *byte = (sample * 255.999) as u8;
        }

        Ok(())
    }

    /// Copies kind, points, and samples from `other` and marks this curve
    /// dirty, recomputing its derived state.
    pub fn copy_from(&mut self, other: &Curve) {
        self.kind = other.kind;
        self.points = other.points.clone();
        self.samples = other.samples.clone();
        self.mark_dirty();
    }

    /// Opens a batch-edit scope.
    ///
    /// While the outermost scope is alive, mutations only mark the curve
    /// dirty; the sample table is recomputed once when that scope drops.
    ///
    /// ```rust
    /// use picman_curve::Curve;
    ///
    /// let mut curve = Curve::new();
    /// {
    ///     let mut edit = curve.edit();
    ///     edit.set_point(4, 0.25, 0.1).unwrap();
    ///     edit.set_point(12, 0.75, 0.9).unwrap();
    /// } // one recompute here
    /// assert_eq!(curve.map_value(0.25), 0.1);
    /// ```
    pub fn edit(&mut self) -> EditScope<'_> {
        self.freeze_depth += 1;
        EditScope { curve: self }
    }

    fn check_point_index(&self, index: usize) -> CurveResult<()> {
        if index >= self.points.len() {
            return Err(CurveError::InvalidPoint {
                index,
                n_points: self.points.len(),
            });
        }
        Ok(())
    }

    /// Clears the identity hint and recomputes, or defers the recompute
    /// to the enclosing edit scope.
    fn mark_dirty(&mut self) {
        self.identity = false;

        if self.freeze_depth == 0 {
            self.recompute();
        } else {
            self.pending = true;
        }
    }

    fn recompute(&mut self) {
        // free curves need no recompute, their samples are the ground truth
        if self.kind == CurveKind::Smooth {
            spline::recompute(&self.points, &mut self.samples);
        }
    }

    pub(crate) fn restore_deserialized(
        kind: CurveKind,
        points: Vec<CurvePoint>,
        samples: Vec<f64>,
    ) -> Self {
        Self {
            kind,
            points,
            samples,
            // loaded state is never assumed fresh
            identity: false,
            freeze_depth: 0,
            pending: false,
        }
    }
}

fn check_point_coord(value: f64) -> CurveResult<()> {
    if value == -1.0 || (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CurveError::InvalidCoordinate { value })
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Curve {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            points: self.points.clone(),
            samples: self.samples.clone(),
            identity: self.identity,
            freeze_depth: 0,
            pending: false,
        }
    }
}

/// Two curves are equal iff their kind, point array, and sample table
/// match exactly.
impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.points == other.points && self.samples == other.samples
    }
}

/// RAII batch-edit scope returned by [`Curve::edit`].
///
/// Dereferences to the curve; dropping the outermost scope triggers the
/// single deferred recompute.
#[derive(Debug)]
pub struct EditScope<'a> {
    curve: &'a mut Curve,
}

impl Deref for EditScope<'_> {
    type Target = Curve;

    fn deref(&self) -> &Curve {
        self.curve
    }
}

impl DerefMut for EditScope<'_> {
    fn deref_mut(&mut self) -> &mut Curve {
        self.curve
    }
}

impl Drop for EditScope<'_> {
    fn drop(&mut self) {
        self.curve.freeze_depth -= 1;

        if self.curve.freeze_depth == 0 && self.curve.pending {
            self.curve.pending = false;
            self.curve.recompute();
        }
    }
}
