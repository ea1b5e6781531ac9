//! Per-pixel application of a [`CurvesConfig`].

use crate::layout::{Layout, PAR_CHUNK_PIXELS};
use crate::OpsResult;
use picman_tone::{Channel, CurvesConfig};
use rayon::prelude::*;
use tracing::debug;

const COLOR_CURVES: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

/// Maps an interleaved pixel buffer through the curves in `config`.
///
/// RGB components pass through their channel curve and then the
/// composite value curve; grayscale through the value curve alone.
/// Alpha passes through the alpha curve only. Identity curves are
/// skipped.
///
/// # Example
///
/// ```rust
/// use picman_ops::apply_curves;
/// use picman_tone::{Channel, CurvesConfig};
///
/// let mut config = CurvesConfig::new();
/// config.curve_mut(Channel::Value).set_point(8, 0.5, 0.8).unwrap();
///
/// let mut pixels = vec![0.5f32; 4];
/// apply_curves(&config, &mut pixels, 4).unwrap();
///
/// assert!((pixels[0] - 0.8).abs() < 1e-6);
/// assert!((pixels[3] - 0.5).abs() < 1e-6); // alpha untouched
/// ```
pub fn apply_curves(config: &CurvesConfig, pixels: &mut [f32], channels: usize) -> OpsResult<()> {
    let layout = Layout::check(pixels.len(), channels)?;

    debug!(
        pixels = pixels.len() / channels,
        channels, "applying curves"
    );

    for pixel in pixels.chunks_exact_mut(channels) {
        map_pixel(config, pixel, layout);
    }

    Ok(())
}

/// Parallel version of [`apply_curves`], splitting the buffer into
/// pixel-aligned chunks.
pub fn par_apply_curves(
    config: &CurvesConfig,
    pixels: &mut [f32],
    channels: usize,
) -> OpsResult<()> {
    let layout = Layout::check(pixels.len(), channels)?;

    debug!(
        pixels = pixels.len() / channels,
        channels, "applying curves in parallel"
    );

    pixels
        .par_chunks_mut(channels * PAR_CHUNK_PIXELS)
        .for_each(|chunk| {
            for pixel in chunk.chunks_exact_mut(channels) {
                map_pixel(config, pixel, layout);
            }
        });

    Ok(())
}

#[inline]
fn map_pixel(config: &CurvesConfig, pixel: &mut [f32], layout: Layout) {
    let value_curve = config.curve(Channel::Value);

    for (i, component) in pixel[..layout.color].iter_mut().enumerate() {
        let mut v = *component as f64;

        if layout.color == 3 {
            let curve = config.curve(COLOR_CURVES[i]);
            if !curve.is_identity() {
                v = curve.map_value(v);
            }
        }

        if !value_curve.is_identity() {
            v = value_curve.map_value(v);
        }

        *component = v as f32;
    }

    if layout.has_alpha {
        let curve = config.curve(Channel::Alpha);
        if !curve.is_identity() {
            let last = pixel.len() - 1;
            pixel[last] = curve.map_value(pixel[last] as f64) as f32;
        }
    }
}
