//! Levels adjustment configuration.
//!
//! A [`LevelsConfig`] stores per-channel input/output ranges and a gamma
//! exponent. It can map values directly or be converted into an
//! equivalent [`CurvesConfig`] for editing in curve form.
//!
//! # Legacy format
//!
//! The legacy levels interchange format is a plain text file:
//!
//! ```text
//! # PICMAN Levels File
//! 0 255 0 255 1.000000
//! (one line of low-input, high-input, low-output, high-output,
//!  gamma per channel, Value/Red/Green/Blue/Alpha order)
//! ```
//!
//! Range bounds are integers in `[0, 255]`; gamma is a positive float.

use crate::channel::{Channel, NUM_CHANNELS};
use crate::curves::CurvesConfig;
use crate::error::{ToneError, ToneResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header line of the legacy levels file format.
const LEVELS_FILE_HEADER: &str = "# PICMAN Levels File";

/// Number of interior control points used when approximating a gamma
/// power law with a spline in [`LevelsConfig::to_curves`].
const GAMMA_POINTS: i32 = 4;

/// Per-channel levels adjustment with a UI channel selector.
///
/// All range bounds are normalized to `[0, 1]`; the identity adjustment
/// is gamma 1 with full input and output ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LevelsConfig {
    /// Gamma exponent per channel.
    pub gamma: [f64; NUM_CHANNELS],
    /// Lower input range bound per channel.
    pub low_input: [f64; NUM_CHANNELS],
    /// Upper input range bound per channel.
    pub high_input: [f64; NUM_CHANNELS],
    /// Lower output range bound per channel.
    pub low_output: [f64; NUM_CHANNELS],
    /// Upper output range bound per channel.
    pub high_output: [f64; NUM_CHANNELS],

    /// The channel currently selected in the UI. Not part of equality or
    /// serialized state.
    #[serde(skip)]
    pub channel: Channel,
}

impl LevelsConfig {
    /// Creates the identity adjustment.
    pub fn new() -> Self {
        Self {
            gamma: [1.0; NUM_CHANNELS],
            low_input: [0.0; NUM_CHANNELS],
            high_input: [1.0; NUM_CHANNELS],
            low_output: [0.0; NUM_CHANNELS],
            high_output: [1.0; NUM_CHANNELS],
            channel: Channel::Value,
        }
    }

    /// Resets one channel to the identity adjustment.
    pub fn reset_channel(&mut self, channel: Channel) {
        let c = channel.index();

        self.gamma[c] = 1.0;
        self.low_input[c] = 0.0;
        self.high_input[c] = 1.0;
        self.low_output[c] = 0.0;
        self.high_output[c] = 1.0;
    }

    /// Resets every channel and the selector.
    pub fn reset(&mut self) {
        for channel in Channel::ALL {
            self.reset_channel(channel);
        }
        self.channel = Channel::Value;
    }

    /// Maps `value` through the input range stretch and gamma correction,
    /// without applying the output range.
    pub fn map_input(&self, channel: Channel, value: f64) -> f64 {
        let c = channel.index();
        let delta = self.high_input[c] - self.low_input[c];

        let mut value = if delta != 0.0 {
            (value - self.low_input[c]) / delta
        } else {
            value - self.low_input[c]
        };

        value = value.clamp(0.0, 1.0);

        if self.gamma[c] != 0.0 {
            value = value.powf(1.0 / self.gamma[c]);
        }

        value
    }

    /// Maps `value` through the full adjustment for `channel`.
    pub fn map(&self, channel: Channel, value: f64) -> f64 {
        let c = channel.index();
        let value = self.map_input(channel, value);

        self.low_output[c] + value * (self.high_output[c] - self.low_output[c])
    }

    /// Converts the adjustment into an equivalent curves configuration.
    ///
    /// The input/output ranges become the first and last control points.
    /// A non-unit gamma is a power law the spline cannot reproduce
    /// exactly, so three interior points are placed on it, spaced
    /// geometrically so they cluster where the curvature is greatest.
    pub fn to_curves(&self) -> ToneResult<CurvesConfig> {
        let mut curves = CurvesConfig::new();

        for channel in Channel::ALL {
            let c = channel.index();
            let gamma = self.gamma[c];
            let delta_in = self.high_input[c] - self.low_input[c];
            let delta_out = self.high_output[c] - self.low_output[c];

            let curve = curves.curve_mut(channel);
            let n_points = curve.n_points() as i32;
            let mut point = -1;

            let mut edit = curve.edit();

            // clear the default anchors
            edit.set_point(0, -1.0, -1.0)?;
            edit.set_point(n_points as usize - 1, -1.0, -1.0)?;

            let x = self.low_input[c];
            let y = self.low_output[c];
            point = next_slot(n_points, x, point, n_points - 1 - GAMMA_POINTS);
            edit.set_point(point as usize, x, y)?;

            if delta_out != 0.0 && gamma != 1.0 {
                if gamma > 1.0 {
                    // The curvature is greatest near the low end, so the
                    // interior x positions are spaced as x0, gamma * x0,
                    // gamma^2 * x0, with the sum matching the input range.
                    let mut dx = 0.0;
                    for _ in 0..GAMMA_POINTS {
                        dx = dx * gamma + 1.0;
                    }
                    let x0 = delta_in / dx;

                    dx = 0.0;
                    for i in 1..GAMMA_POINTS {
                        dx = dx * gamma + x0;

                        let x = self.low_input[c] + dx;
                        let y = self.low_output[c]
                            + delta_out * self.map_input(channel, x);

                        point = next_slot(n_points, x, point, n_points - 1 - GAMMA_POINTS + i);
                        edit.set_point(point as usize, x, y)?;
                    }
                } else {
                    // A gamma below one is the mirror image of the case
                    // above along y = x, so invert the adjustment, swap
                    // the axes, and space the y positions instead.
                    let mut inverted = self.clone();
                    let gamma_inv = 1.0 / gamma;

                    inverted.gamma[c] = gamma_inv;
                    inverted.low_input[c] = self.low_output[c];
                    inverted.low_output[c] = self.low_input[c];
                    inverted.high_input[c] = self.high_output[c];
                    inverted.high_output[c] = self.high_input[c];

                    let mut dy = 0.0;
                    for _ in 0..GAMMA_POINTS {
                        dy = dy * gamma_inv + 1.0;
                    }
                    let y0 = delta_out / dy;

                    dy = 0.0;
                    for i in 1..GAMMA_POINTS {
                        dy = dy * gamma_inv + y0;

                        let y = self.low_output[c] + dy;
                        let x = self.low_input[c]
                            + delta_in * inverted.map_input(channel, y);

                        point = next_slot(n_points, x, point, n_points - 1 - GAMMA_POINTS + i);
                        edit.set_point(point as usize, x, y)?;
                    }
                }
            }

            let x = self.high_input[c];
            let y = self.high_output[c];
            point = next_slot(n_points, x, point, n_points - 1);
            edit.set_point(point as usize, x, y)?;
        }

        Ok(curves)
    }
}

/// Point slot for position `x`, truncated and clamped past the last slot
/// already taken. The lower bound wins when the bounds cross, so slots
/// always advance strictly.
fn next_slot(n_points: i32, x: f64, taken: i32, high: i32) -> i32 {
    let slot = (n_points as f64 * x) as i32;
    let low = taken + 1;

    if slot < low {
        low
    } else if slot > high {
        high
    } else {
        slot
    }
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel selection is UI state and takes no part in comparison.
impl PartialEq for LevelsConfig {
    fn eq(&self, other: &Self) -> bool {
        self.gamma == other.gamma
            && self.low_input == other.low_input
            && self.high_input == other.high_input
            && self.low_output == other.low_output
            && self.high_output == other.high_output
    }
}

/// Reads a legacy levels file from disk.
pub fn read_levels_file(path: &Path) -> ToneResult<LevelsConfig> {
    let file = File::open(path)?;
    parse_levels_file(BufReader::new(file))
}

/// Parses the legacy levels format from a reader.
///
/// The whole file is validated before any state is built; a malformed
/// file yields a [`ToneError::Parse`] and no partial config.
pub fn parse_levels_file<R: BufRead>(mut reader: R) -> ToneResult<LevelsConfig> {
    let mut header = String::new();
    reader.read_line(&mut header)?;

    if header.trim_end_matches(['\r', '\n']) != LEVELS_FILE_HEADER {
        return Err(ToneError::Parse("not a PICMAN Levels file".into()));
    }

    let mut tokens = Vec::with_capacity(NUM_CHANNELS * 5);
    for line in reader.lines() {
        for token in line?.split_whitespace() {
            tokens.push(token.to_string());
        }
    }

    if tokens.len() < NUM_CHANNELS * 5 {
        return Err(ToneError::Parse(format!(
            "expected {} level values, got {}",
            NUM_CHANNELS * 5,
            tokens.len()
        )));
    }

    let mut config = LevelsConfig::new();

    for i in 0..NUM_CHANNELS {
        let mut bounds = [0.0; 4];
        for (j, bound) in bounds.iter_mut().enumerate() {
            let token = &tokens[i * 5 + j];
            let value: i32 = token
                .parse()
                .map_err(|_| ToneError::Parse(format!("invalid integer {token:?}")))?;
            if !(0..=255).contains(&value) {
                return Err(ToneError::Parse(format!("level value {value} out of range")));
            }
            *bound = value as f64 / 255.0;
        }

        let token = &tokens[i * 5 + 4];
        let gamma: f64 = token
            .parse()
            .map_err(|_| ToneError::Parse(format!("invalid gamma {token:?}")))?;
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(ToneError::Parse(format!("gamma {gamma} out of range")));
        }

        config.low_input[i] = bounds[0];
        config.high_input[i] = bounds[1];
        config.low_output[i] = bounds[2];
        config.high_output[i] = bounds[3];
        config.gamma[i] = gamma;
    }

    Ok(config)
}

/// Writes a legacy levels file to disk.
pub fn write_levels_file(path: &Path, config: &LevelsConfig) -> ToneResult<()> {
    let file = File::create(path)?;
    write_levels_file_to(BufWriter::new(file), config)
}

/// Writes the legacy levels format to any writer.
pub fn write_levels_file_to<W: Write>(mut writer: W, config: &LevelsConfig) -> ToneResult<()> {
    writeln!(writer, "{LEVELS_FILE_HEADER}")?;

    for i in 0..NUM_CHANNELS {
        writeln!(
            writer,
            "{} {} {} {} {:.6}",
            (config.low_input[i] * 255.999) as i32,
            (config.high_input[i] * 255.999) as i32,
            (config.low_output[i] * 255.999) as i32,
            (config.high_output[i] * 255.999) as i32,
            config.gamma[i]
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;

    #[test]
    fn test_default_is_identity() {
        let config = LevelsConfig::new();

        for channel in Channel::ALL {
            for i in 0..=20 {
                let x = i as f64 / 20.0;
                assert_abs_diff_eq!(config.map(channel, x), x, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_gamma_map_input() {
        let mut config = LevelsConfig::new();
        config.gamma[Channel::Value.index()] = 2.0;

        assert_abs_diff_eq!(config.map_input(Channel::Value, 0.25), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(config.map_input(Channel::Value, 0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(config.map_input(Channel::Value, 1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_input_range_stretches_and_clamps() {
        let mut config = LevelsConfig::new();
        config.low_input[0] = 0.25;
        config.high_input[0] = 0.75;

        assert_abs_diff_eq!(config.map(Channel::Value, 0.5), 0.5, epsilon = 1e-12);
        assert_eq!(config.map(Channel::Value, 0.1), 0.0);
        assert_eq!(config.map(Channel::Value, 0.9), 1.0);
    }

    #[test]
    fn test_output_range_compresses() {
        let mut config = LevelsConfig::new();
        config.low_output[0] = 0.2;
        config.high_output[0] = 0.8;

        assert_abs_diff_eq!(config.map(Channel::Value, 0.0), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(config.map(Channel::Value, 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(config.map(Channel::Value, 1.0), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_inverted_output_range() {
        let mut config = LevelsConfig::new();
        config.low_output[0] = 1.0;
        config.high_output[0] = 0.0;

        assert_abs_diff_eq!(config.map(Channel::Value, 0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(config.map(Channel::Value, 1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_curves_identity() {
        let curves = LevelsConfig::new().to_curves().unwrap();

        for channel in Channel::ALL {
            for i in 0..=20 {
                let x = i as f64 / 20.0;
                assert_abs_diff_eq!(
                    curves.curve(channel).map_value(x),
                    x,
                    epsilon = 1.0 / 255.0
                );
            }
        }
    }

    #[test]
    fn test_to_curves_gamma_above_one() {
        let mut config = LevelsConfig::new();
        config.gamma[0] = 2.0;

        let curves = config.to_curves().unwrap();
        let curve = curves.curve(Channel::Value);

        // endpoints stay exact
        assert_eq!(curve.map_value(0.0), 0.0);
        assert_eq!(curve.map_value(1.0), 1.0);

        // the spline tracks the power law away from the steep toe
        for i in 2..=20 {
            let x = i as f64 / 20.0;
            assert_abs_diff_eq!(curve.map_value(x), config.map(Channel::Value, x), epsilon = 0.05);
        }
    }

    #[test]
    fn test_to_curves_gamma_below_one() {
        let mut config = LevelsConfig::new();
        config.gamma[0] = 0.5;

        let curves = config.to_curves().unwrap();
        let curve = curves.curve(Channel::Value);

        assert_eq!(curve.map_value(0.0), 0.0);
        assert_eq!(curve.map_value(1.0), 1.0);

        for i in 0..=18 {
            let x = i as f64 / 20.0;
            assert_abs_diff_eq!(curve.map_value(x), config.map(Channel::Value, x), epsilon = 0.05);
        }
    }

    #[test]
    fn test_to_curves_with_ranges() {
        let mut config = LevelsConfig::new();
        config.low_input[0] = 0.1;
        config.high_input[0] = 0.9;
        config.low_output[0] = 0.2;
        config.high_output[0] = 0.8;

        let curves = config.to_curves().unwrap();
        let curve = curves.curve(Channel::Value);

        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert_abs_diff_eq!(curve.map_value(x), config.map(Channel::Value, x), epsilon = 0.02);
        }
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let data = "# PICMAN Curves File\n0 255 0 255 1.0\n";

        assert!(matches!(
            parse_levels_file(Cursor::new(data)),
            Err(ToneError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_file() {
        let data = "# PICMAN Levels File\n0 255 0 255 1.0\n";

        assert!(matches!(
            parse_levels_file(Cursor::new(data)),
            Err(ToneError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let mut data = String::from("# PICMAN Levels File\n");
        data.push_str("0 300 0 255 1.0\n");
        data.push_str(&"0 255 0 255 1.0\n".repeat(4));

        assert!(matches!(
            parse_levels_file(Cursor::new(data)),
            Err(ToneError::Parse(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let mut config = LevelsConfig::new();
        config.gamma[1] = 1.8;
        config.low_input[1] = 0.1;
        config.high_output[3] = 0.9;

        let mut buf = Vec::new();
        write_levels_file_to(&mut buf, &config).unwrap();

        let parsed = parse_levels_file(Cursor::new(buf)).unwrap();

        for c in 0..NUM_CHANNELS {
            assert_abs_diff_eq!(parsed.gamma[c], config.gamma[c], epsilon = 1e-6);
            assert_abs_diff_eq!(parsed.low_input[c], config.low_input[c], epsilon = 1.0 / 255.0);
            assert_abs_diff_eq!(parsed.high_output[c], config.high_output[c], epsilon = 1.0 / 255.0);
        }
    }

    #[test]
    fn test_read_write_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.levels");

        let mut config = LevelsConfig::new();
        config.gamma[0] = 2.2;

        write_levels_file(&path, &config).unwrap();
        let loaded = read_levels_file(&path).unwrap();

        assert_abs_diff_eq!(loaded.gamma[0], 2.2, epsilon = 1e-6);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = LevelsConfig::new();
        config.gamma[2] = 0.7;
        config.low_output[4] = 0.25;
        config.channel = Channel::Green;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: LevelsConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.channel, Channel::Value);
    }

    #[test]
    fn test_equality_ignores_selector() {
        let mut a = LevelsConfig::new();
        let mut b = LevelsConfig::new();

        a.channel = Channel::Red;
        b.channel = Channel::Alpha;
        assert_eq!(a, b);

        b.gamma[0] = 2.0;
        assert_ne!(a, b);
    }
}
