//! Sample-table recomputation for smooth curves.
//!
//! A smooth curve is rendered into its dense sample table one Bezier
//! segment per pair of adjacent active control points. The inner Bezier
//! x-coordinates are fixed at the thirds of each segment, which makes
//! x(t) linear in t, so only the y ordinates need solving and evaluation
//! stays closed-form and O(n_samples).

use crate::types::CurvePoint;

/// Index of the sample nearest to normalized position `x`.
#[inline]
pub(crate) fn sample_index(x: f64, n_samples: usize) -> usize {
    (x * (n_samples - 1) as f64).round() as usize
}

/// Re-render `samples` from the active control points in `points`.
///
/// Sample ranges before the first and after the last active point are
/// flat-filled with that point's y value. After all segments are plotted,
/// the sample at each active point's position is overwritten with its
/// stored y so control points are hit exactly.
pub(crate) fn recompute(points: &[CurvePoint], samples: &mut [f64]) {
    let n_samples = samples.len();

    let active: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_active())
        .map(|(i, _)| i)
        .collect();

    if let (Some(&first), Some(&last)) = (active.first(), active.last()) {
        let point = points[first];
        let boundary = sample_index(point.x, n_samples);
        for sample in &mut samples[..boundary] {
            *sample = point.y;
        }

        let point = points[last];
        let boundary = sample_index(point.x, n_samples);
        for sample in &mut samples[boundary..] {
            *sample = point.y;
        }
    }

    for i in 0..active.len().saturating_sub(1) {
        let p1 = active[i.saturating_sub(1)];
        let p2 = active[i];
        let p3 = active[i + 1];
        let p4 = active[(i + 2).min(active.len() - 1)];

        plot_segment(points, samples, p1, p2, p3, p4);
    }

    // ensure that the control points are used exactly
    for &i in &active {
        let point = points[i];
        samples[sample_index(point.x, n_samples)] = point.y;
    }
}

/// Plot the samples between control points `p2` and `p3` as a cubic
/// Bezier segment, taking the potentially existing neighbors `p1` and
/// `p4` into account (`p1 == p2` / `p3 == p4` mean "no neighbor").
fn plot_segment(
    points: &[CurvePoint],
    samples: &mut [f64],
    p1: usize,
    p2: usize,
    p3: usize,
    p4: usize,
) {
    let n_samples = samples.len();

    // outer anchors of the Bezier segment
    let x0 = points[p2].x;
    let y0 = points[p2].y;
    let x3 = points[p3].x;
    let y3 = points[p3].y;

    let dx = x3 - x0;
    let dy = y3 - y0;

    // caller guarantees x-ordering of active points
    if dx <= 0.0 {
        return;
    }

    // The inner control x values are fixed at x0 + dx/3 and x0 + 2*dx/3,
    // so only y1 and y2 need to be derived from the neighbor slopes.
    let y1;
    let y2;

    if p1 == p2 && p3 == p4 {
        // no neighbors: straight line
        y1 = y0 + dy / 3.0;
        y2 = y0 + dy * 2.0 / 3.0;
    } else if p1 == p2 && p3 != p4 {
        // only the right neighbor exists: match its tangent to the chord
        // from the left anchor to the right neighbor, then aim the left
        // tangent at the right handle to avoid an inflection point
        let slope = (points[p4].y - y0) / (points[p4].x - x0);

        y2 = y3 - slope * dx / 3.0;
        y1 = y0 + (y2 - y0) / 2.0;
    } else if p1 != p2 && p3 == p4 {
        // mirror of the previous case
        let slope = (y3 - points[p1].y) / (x3 - points[p1].x);

        y1 = y0 + slope * dx / 3.0;
        y2 = y3 + (y1 - y3) / 2.0;
    } else {
        // both neighbors exist: each tangent parallels the chord between
        // the opposite anchor and the adjacent neighbor
        let left_slope = (y3 - points[p1].y) / (x3 - points[p1].x);
        let right_slope = (points[p4].y - y0) / (points[p4].x - x0);

        y1 = y0 + left_slope * dx / 3.0;
        y2 = y3 - right_slope * dx / 3.0;
    }

    // x(t) is linear in t, so evenly spaced t values land on consecutive
    // sample indices
    let offset = sample_index(x0, n_samples);
    let span = (dx * (n_samples - 1) as f64).round() as usize;

    for i in 0..=span {
        let t = i as f64 / dx / (n_samples - 1) as f64;
        let u = 1.0 - t;

        let y = y0 * u * u * u + 3.0 * y1 * u * u * t + 3.0 * y2 * u * t * t + y3 * t * t * t;

        let index = i + offset;
        if index < n_samples {
            samples[index] = y.clamp(0.0, 1.0);
        }
    }
}
