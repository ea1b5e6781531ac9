//! Multi-channel curves configuration.
//!
//! A [`CurvesConfig`] owns one [`Curve`] per [`Channel`] plus a UI-selected
//! channel field that plays no part in comparison or serialization.
//!
//! # Legacy format
//!
//! The crate also reads and writes the legacy curves interchange format, a
//! plain text file with the following structure:
//!
//! ```text
//! # PICMAN Curves File
//! 0 0 -1 -1 ... 255 255
//! (one line of 17 index/value pairs per channel,
//!  Value/Red/Green/Blue/Alpha order)
//! ```
//!
//! Pairs are integers in `[0, 255]`, or `-1 -1` for an unset point slot.

use crate::channel::{Channel, NUM_CHANNELS};
use crate::error::{ToneError, ToneResult};
use picman_curve::{Curve, CurveKind};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header line of the legacy curves file format.
const CURVES_FILE_HEADER: &str = "# PICMAN Curves File";

/// Number of point pairs per channel in the legacy format.
const N_CRUFT_POINTS: usize = 17;

/// Per-channel tone curves with a UI channel selector.
///
/// # Example
///
/// ```rust
/// use picman_tone::{Channel, CurvesConfig};
///
/// let mut config = CurvesConfig::new();
/// config.curve_mut(Channel::Red).set_point(8, 0.5, 0.7).unwrap();
///
/// assert!(!config.curve(Channel::Red).is_identity());
/// assert!(config.curve(Channel::Green).is_identity());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvesConfig {
    /// One curve per channel, in [`Channel::ALL`] order.
    curves: [Curve; NUM_CHANNELS],

    /// The channel currently selected in the UI. Not part of equality or
    /// serialized state.
    #[serde(skip)]
    pub channel: Channel,
}

impl CurvesConfig {
    /// Creates a config with identity curves on every channel.
    pub fn new() -> Self {
        Self {
            curves: std::array::from_fn(|_| Curve::new()),
            channel: Channel::Value,
        }
    }

    /// Builds a config with a smooth curve on one channel from 8-bit
    /// control points, given as interleaved `x, y` pairs.
    pub fn from_spline_points(channel: Channel, points: &[u8]) -> ToneResult<Self> {
        let mut config = Self::new();

        {
            let curve = config.curve_mut(channel);
            let last = curve.n_points() - 1;
            let n_points = (points.len() / 2).min(curve.n_points());

            let mut edit = curve.edit();

            // unset the default upper anchor; the loaded points replace it
            edit.set_point(last, -1.0, -1.0)?;

            for i in 0..n_points {
                edit.set_point(
                    i,
                    points[i * 2] as f64 / 255.0,
                    points[i * 2 + 1] as f64 / 255.0,
                )?;
            }
        }

        Ok(config)
    }

    /// Builds a config with a free curve on one channel from an explicit
    /// 8-bit sample table.
    pub fn from_explicit_samples(channel: Channel, samples: &[u8; 256]) -> ToneResult<Self> {
        let mut config = Self::new();

        {
            let curve = config.curve_mut(channel);
            let mut edit = curve.edit();

            edit.set_kind(CurveKind::Free);

            for (i, &sample) in samples.iter().enumerate() {
                edit.set_curve_value(i as f64 / 255.0, sample as f64 / 255.0)?;
            }
        }

        Ok(config)
    }

    /// The curve for `channel`.
    #[inline]
    pub fn curve(&self, channel: Channel) -> &Curve {
        &self.curves[channel.index()]
    }

    /// Mutable access to the curve for `channel`.
    #[inline]
    pub fn curve_mut(&mut self, channel: Channel) -> &mut Curve {
        &mut self.curves[channel.index()]
    }

    /// Resets one channel to the identity curve.
    pub fn reset_channel(&mut self, channel: Channel) {
        self.curves[channel.index()].reset(true);
    }

    /// Resets every channel and the selector.
    pub fn reset(&mut self) {
        for curve in &mut self.curves {
            curve.reset(true);
        }
        self.channel = Channel::Value;
    }

    /// Whether every channel curve is known to be an identity mapping.
    pub fn is_identity(&self) -> bool {
        self.curves.iter().all(|c| c.is_identity())
    }
}

impl Default for CurvesConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel selection is UI state and takes no part in comparison.
impl PartialEq for CurvesConfig {
    fn eq(&self, other: &Self) -> bool {
        self.curves == other.curves
    }
}

/// Reads a legacy curves file from disk.
pub fn read_curves_file(path: &Path) -> ToneResult<CurvesConfig> {
    let file = File::open(path)?;
    parse_curves_file(BufReader::new(file))
}

/// Parses the legacy curves format from a reader.
///
/// The whole file is validated before any state is built; a malformed
/// file yields a [`ToneError::Parse`] and no partial config.
pub fn parse_curves_file<R: BufRead>(mut reader: R) -> ToneResult<CurvesConfig> {
    let mut header = String::new();
    reader.read_line(&mut header)?;

    if header.trim_end_matches(['\r', '\n']) != CURVES_FILE_HEADER {
        return Err(ToneError::Parse("not a PICMAN Curves file".into()));
    }

    let mut values = Vec::with_capacity(NUM_CHANNELS * N_CRUFT_POINTS * 2);
    for line in reader.lines() {
        for token in line?.split_whitespace() {
            let value: i32 = token
                .parse()
                .map_err(|_| ToneError::Parse(format!("invalid integer {token:?}")))?;
            if value > 255 {
                return Err(ToneError::Parse(format!("point value {value} out of range")));
            }
            values.push(value);
        }
    }

    if values.len() < NUM_CHANNELS * N_CRUFT_POINTS * 2 {
        return Err(ToneError::Parse(format!(
            "expected {} point values, got {}",
            NUM_CHANNELS * N_CRUFT_POINTS * 2,
            values.len()
        )));
    }

    let mut config = CurvesConfig::new();

    for (i, channel) in Channel::ALL.into_iter().enumerate() {
        let curve = config.curve_mut(channel);
        let mut edit = curve.edit();

        edit.set_kind(CurveKind::Smooth);
        edit.reset(false);

        for j in 0..N_CRUFT_POINTS {
            let index = values[(i * N_CRUFT_POINTS + j) * 2];
            let value = values[(i * N_CRUFT_POINTS + j) * 2 + 1];

            if index < 0 || value < 0 {
                edit.set_point(j, -1.0, -1.0)?;
            } else {
                edit.set_point(j, index as f64 / 255.0, value as f64 / 255.0)?;
            }
        }
    }

    Ok(config)
}

/// Writes a legacy curves file to disk.
pub fn write_curves_file(path: &Path, config: &CurvesConfig) -> ToneResult<()> {
    let file = File::create(path)?;
    write_curves_file_to(BufWriter::new(file), config)
}

/// Writes the legacy curves format to any writer.
///
/// Free curves have no meaningful control points, so a scratch copy is
/// switched to smooth first, deriving points from the sample table; the
/// config itself is left untouched.
pub fn write_curves_file_to<W: Write>(mut writer: W, config: &CurvesConfig) -> ToneResult<()> {
    writeln!(writer, "{CURVES_FILE_HEADER}")?;

    for channel in Channel::ALL {
        let curve = config.curve(channel);

        let scratch;
        let points = if curve.kind() == CurveKind::Free {
            let mut derived = curve.clone();
            derived.set_kind(CurveKind::Smooth);
            scratch = derived;
            scratch.points()
        } else {
            curve.points()
        };

        for point in points {
            if point.x < 0.0 || point.y < 0.0 {
                write!(writer, "-1 -1 ")?;
            } else {
                write!(
                    writer,
                    "{} {} ",
                    (point.x * 255.999) as i32,
                    (point.y * 255.999) as i32
                )?;
            }
        }

        writeln!(writer)?;
    }

    Ok(())
}
