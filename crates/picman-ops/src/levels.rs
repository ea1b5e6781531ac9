//! Per-pixel application of a [`LevelsConfig`].

use crate::layout::{Layout, PAR_CHUNK_PIXELS};
use crate::OpsResult;
use picman_tone::{Channel, LevelsConfig};
use rayon::prelude::*;
use tracing::debug;

const COLOR_CHANNELS: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

/// Maps an interleaved pixel buffer through the adjustment in `config`.
///
/// RGB components pass through their channel adjustment and then the
/// composite value adjustment; grayscale through the value adjustment
/// alone. Alpha passes through the alpha adjustment only.
pub fn apply_levels(config: &LevelsConfig, pixels: &mut [f32], channels: usize) -> OpsResult<()> {
    let layout = Layout::check(pixels.len(), channels)?;

    debug!(
        pixels = pixels.len() / channels,
        channels, "applying levels"
    );

    for pixel in pixels.chunks_exact_mut(channels) {
        map_pixel(config, pixel, layout);
    }

    Ok(())
}

/// Parallel version of [`apply_levels`], splitting the buffer into
/// pixel-aligned chunks.
pub fn par_apply_levels(
    config: &LevelsConfig,
    pixels: &mut [f32],
    channels: usize,
) -> OpsResult<()> {
    let layout = Layout::check(pixels.len(), channels)?;

    debug!(
        pixels = pixels.len() / channels,
        channels, "applying levels in parallel"
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
fn map_pixel(config: &LevelsConfig, pixel: &mut [f32], layout: Layout) {
    for (i, component) in pixel[..layout.color].iter_mut().enumerate() {
        let mut v = *component as f64;

        if layout.color == 3 {
            v = config.map(COLOR_CHANNELS[i], v);
        }

        v = config.map(Channel::Value, v);

        *component = v as f32;
    }

    if layout.has_alpha {
        let last = pixel.len() - 1;
        pixel[last] = config.map(Channel::Alpha, pixel[last] as f64) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_config_keeps_values() {
        let config = LevelsConfig::new();
        let mut pixels = vec![0.1f32, 0.456, 0.9, 0.5];

        apply_levels(&config, &mut pixels, 4).unwrap();

        assert_abs_diff_eq!(pixels[0], 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(pixels[1], 0.456, epsilon = 1e-6);
        assert_abs_diff_eq!(pixels[2], 0.9, epsilon = 1e-6);
        assert_abs_diff_eq!(pixels[3], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_gamma_applies_to_color_not_alpha() {
        let mut config = LevelsConfig::new();
        config.gamma[Channel::Value.index()] = 2.0;

        let mut pixels = vec![0.25f32, 0.25, 0.25, 0.25];
        apply_levels(&config, &mut pixels, 4).unwrap();

        for component in &pixels[..3] {
            assert_abs_diff_eq!(*component, 0.5, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(pixels[3], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_channel_adjustment_cascades() {
        let mut config = LevelsConfig::new();
        config.gamma[Channel::Red.index()] = 2.0;
        config.gamma[Channel::Value.index()] = 2.0;

        let mut pixels = vec![0.0625f32, 0.0625, 0.0625];
        apply_levels(&config, &mut pixels, 3).unwrap();

        // red is lifted twice, green and blue once
        assert_abs_diff_eq!(pixels[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(pixels[1], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_output_range_on_gray() {
        let mut config = LevelsConfig::new();
        config.low_output[Channel::Value.index()] = 0.5;

        let mut pixels = vec![0.0f32, 1.0];
        apply_levels(&config, &mut pixels, 1).unwrap();

        assert_abs_diff_eq!(pixels[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(pixels[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let mut config = LevelsConfig::new();
        config.gamma[0] = 1.8;
        config.low_input[2] = 0.1;

        let mut serial: Vec<f32> = (0..3 * 9_001).map(|i| (i % 256) as f32 / 255.0).collect();
        let mut parallel = serial.clone();

        apply_levels(&config, &mut serial, 3).unwrap();
        par_apply_levels(&config, &mut parallel, 3).unwrap();

        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_rejects_bad_layout() {
        let config = LevelsConfig::new();
        let mut pixels = vec![0.0f32; 7];

        assert!(apply_levels(&config, &mut pixels, 3).is_err());
        assert!(apply_levels(&config, &mut pixels, 0).is_err());
    }
}
